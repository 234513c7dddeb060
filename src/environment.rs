//! Equirectangular HDR environment loading.
//!
//! The panoramic radiance image supplies the scene's ambient lighting. It is
//! decoded to linear floats on a loader thread, narrowed to half precision,
//! and uploaded as an `Rgba16Float` texture the geometry pass samples by
//! direction. The visible background stays near black, matching the
//! reference scene; the environment only feeds shading.

use half::f16;
use image::ImageFormat;

use crate::error::LoadError;
use crate::gpu::{GpuContext, HDR_FORMAT};

/// Decoded environment: RGBA half-float texels in equirectangular layout.
pub struct EnvironmentData {
    pub width: u32,
    pub height: u32,
    pub texels: Vec<f16>,
}

impl EnvironmentData {
    /// Decode a Radiance `.hdr` byte buffer.
    pub fn decode(bytes: &[u8]) -> Result<Self, LoadError> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Hdr)
            .map_err(|e| LoadError::decode("HDR environment", e))?
            .to_rgb32f();

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(LoadError::decode("HDR environment", "image is empty"));
        }

        let mut texels = Vec::with_capacity((width * height * 4) as usize);
        for pixel in image.pixels() {
            texels.push(f16::from_f32(pixel[0]));
            texels.push(f16::from_f32(pixel[1]));
            texels.push(f16::from_f32(pixel[2]));
            texels.push(f16::ONE);
        }

        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Upload as a filterable 2D texture.
    pub fn upload(&self, gpu: &GpuContext) -> EnvironmentMap {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Environment Map"),
            size: wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
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
            bytemuck::cast_slice(&self.texels),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * 8),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Environment Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        EnvironmentMap {
            texture,
            view,
            sampler,
        }
    }
}

/// GPU-resident environment map.
pub struct EnvironmentMap {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::hdr::HdrEncoder;
    use image::Rgb;

    #[test]
    fn decodes_radiance_hdr_to_half_texels() {
        let pixels = vec![Rgb([1.0f32, 0.5, 0.25]), Rgb([2.0, 0.0, 0.0])];
        let mut bytes = Vec::new();
        HdrEncoder::new(&mut bytes).encode(&pixels, 2, 1).unwrap();

        let env = EnvironmentData::decode(&bytes).unwrap();
        assert_eq!((env.width, env.height), (2, 1));
        assert_eq!(env.texels.len(), 8);
        // RGBE has limited mantissa precision; just check the ballpark.
        assert!((env.texels[0].to_f32() - 1.0).abs() < 0.01);
        assert!((env.texels[4].to_f32() - 2.0).abs() < 0.02);
        assert_eq!(env.texels[3], f16::ONE);
    }

    #[test]
    fn rejects_garbage_bytes() {
        assert!(matches!(
            EnvironmentData::decode(b"not an hdr file"),
            Err(LoadError::Decode { .. })
        ));
    }
}
