//! Color lookup-table loading.
//!
//! The grading pass samples a 3D LUT. The source is an Autodesk `.3dl` text
//! file: a grid line naming the per-axis sample points, then `size^3` integer
//! RGB rows with red varying slowest and blue fastest. Samples are parsed to
//! `f32`, narrowed once to half precision, and uploaded as a 3D
//! `Rgba16Float` texture. The effect chain cannot finish assembling until
//! this load completes.

use half::f16;

use crate::error::LoadError;
use crate::gpu::{GpuContext, HDR_FORMAT};

/// A parsed lookup table: `size^3` RGB samples in file order, values in 0..1.
pub struct Lut3d {
    pub size: u32,
    /// RGB triplets, blue axis fastest.
    pub samples: Vec<f32>,
}

impl Lut3d {
    /// Parse `.3dl` text.
    pub fn parse_3dl(text: &str) -> Result<Self, LoadError> {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'));

        let grid = lines
            .next()
            .ok_or_else(|| LoadError::decode("3dl LUT", "file is empty"))?;
        let size = grid.split_whitespace().count() as u32;
        if size < 2 {
            return Err(LoadError::decode("3dl LUT", "grid line has fewer than 2 entries"));
        }

        let mut raw = Vec::with_capacity((size * size * size * 3) as usize);
        for line in lines {
            for field in line.split_whitespace() {
                let value: f32 = field
                    .parse()
                    .map_err(|_| LoadError::decode("3dl LUT", format!("bad sample '{field}'")))?;
                raw.push(value);
            }
        }

        let expected = (size * size * size * 3) as usize;
        if raw.len() != expected {
            return Err(LoadError::decode(
                "3dl LUT",
                format!("expected {expected} samples, found {}", raw.len()),
            ));
        }

        // 3dl stores integers at an unspecified bit depth; infer full scale
        // from the largest sample (8, 10, 12, or 16 bits).
        let max = raw.iter().cloned().fold(0.0f32, f32::max);
        let full_scale = [8u32, 10, 12, 16]
            .iter()
            .map(|bits| (1u32 << bits) as f32 - 1.0)
            .find(|&scale| max <= scale)
            .unwrap_or(65535.0);

        let samples = raw.iter().map(|v| v / full_scale).collect();
        Ok(Self { size, samples })
    }

    /// Narrow every sample to half precision, producing RGBA texels ready
    /// for upload. Performed exactly once, before the grading pass attaches.
    pub fn narrow(&self) -> Vec<f16> {
        let mut texels = Vec::with_capacity(self.samples.len() / 3 * 4);
        for rgb in self.samples.chunks_exact(3) {
            texels.push(f16::from_f32(rgb[0]));
            texels.push(f16::from_f32(rgb[1]));
            texels.push(f16::from_f32(rgb[2]));
            texels.push(f16::ONE);
        }
        texels
    }

    /// Upload the narrowed table as a 3D texture.
    ///
    /// File order is blue-fastest, so the memory layout maps texture axes to
    /// (x = blue, y = green, z = red); the grading shader samples with the
    /// color's channels swizzled to match.
    pub fn upload(&self, gpu: &GpuContext) -> LutTexture {
        let texels = self.narrow();

        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Grading LUT"),
            size: wgpu::Extent3d {
                width: self.size,
                height: self.size,
                depth_or_array_layers: self.size,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format: HDR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&texels),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.size * 8),
                rows_per_image: Some(self.size),
            },
            wgpu::Extent3d {
                width: self.size,
                height: self.size,
                depth_or_array_layers: self.size,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::D3),
            ..Default::default()
        });
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Grading LUT Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        LutTexture {
            texture,
            view,
            sampler,
            size: self.size,
        }
    }
}

/// GPU-resident 3D lookup table.
pub struct LutTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn identity_2(scale: u32) -> String {
        // A 2-point LUT with samples at 0 and full scale.
        let mut text = String::from("0 1023\n");
        for r in 0..2u32 {
            for g in 0..2u32 {
                for b in 0..2u32 {
                    text.push_str(&format!("{} {} {}\n", r * scale, g * scale, b * scale));
                }
            }
        }
        text
    }

    #[test]
    fn half_narrowing_round_trips_exact_values() {
        let lut = Lut3d {
            size: 2,
            samples: vec![1.0; 24],
        };
        for texel in lut.narrow() {
            assert_eq!(texel.to_f32(), 1.0);
        }
    }

    #[test]
    fn half_narrowing_snaps_to_nearest_representable() {
        let lut = Lut3d {
            size: 2,
            samples: vec![0.1; 24],
        };
        let narrowed = lut.narrow();
        // 0.1 is not representable in binary16; the nearest half is
        // 0.0999755859375, within the format's precision bound.
        assert_relative_eq!(narrowed[0].to_f32(), 0.1, epsilon = 1e-4);
        assert_ne!(narrowed[0].to_f32(), 0.1);
        assert_eq!(narrowed[0], f16::from_f32(0.1));
    }

    #[test]
    fn narrowed_texels_cast_to_upload_bytes() {
        let lut = Lut3d {
            size: 2,
            samples: vec![0.5; 24],
        };
        let texels = lut.narrow();
        // The upload path views the half texels as raw bytes.
        let bytes: &[u8] = bytemuck::cast_slice(&texels);
        assert_eq!(bytes.len(), texels.len() * 2);
        assert_eq!(
            f16::from_le_bytes([bytes[0], bytes[1]]),
            f16::from_f32(0.5)
        );
    }

    #[test]
    fn parses_a_12_bit_table() {
        let lut = Lut3d::parse_3dl(&identity_2(4095)).unwrap();
        assert_eq!(lut.size, 2);
        assert_eq!(lut.samples.len(), 24);
        assert_relative_eq!(lut.samples[0], 0.0);
        // Last row is full white.
        assert_relative_eq!(lut.samples[21], 1.0);
        assert_relative_eq!(lut.samples[23], 1.0);
    }

    #[test]
    fn infers_10_bit_scale() {
        let lut = Lut3d::parse_3dl(&identity_2(1023)).unwrap();
        assert_relative_eq!(lut.samples[23], 1.0);
    }

    #[test]
    fn rejects_wrong_sample_count() {
        let text = "0 1023\n0 0 0\n";
        assert!(matches!(
            Lut3d::parse_3dl(text),
            Err(LoadError::Decode { .. })
        ));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = format!("# generated\n\n{}", identity_2(4095));
        assert!(Lut3d::parse_3dl(&text).is_ok());
    }
}
