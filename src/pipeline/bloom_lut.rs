//! Combined bloom and color grading, the last effect before the surface
//! blit.
//!
//! Bright regions above a luminance threshold are blurred and added back,
//! then the result is graded through the 3D lookup table. The two live in
//! one pass because both want the final tone-mapped color and neither feeds
//! anything downstream.

use crate::gpu::GpuContext;
use crate::lut::LutTexture;
use crate::pipeline::fullscreen::{
    linear_sampler, sampler_entry, texture3d_entry, texture_entry, uniform_entry,
    FullscreenPipeline,
};
use crate::pipeline::pass::{EffectPass, FrameContext};

#[derive(Clone, Copy, Debug)]
pub struct BloomSettings {
    pub intensity: f32,
    /// Luminance below this contributes nothing to bloom.
    pub luminance_threshold: f32,
    /// Soft-knee width around the threshold.
    pub luminance_smoothing: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            luminance_threshold: 0.75,
            luminance_smoothing: 0.5,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct BloomLutUniforms {
    resolution: [f32; 2],
    intensity: f32,
    luminance_threshold: f32,
    luminance_smoothing: f32,
    lut_size: f32,
    _pad: [f32; 2],
}

pub struct BloomLutPass {
    pipeline: FullscreenPipeline,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    lut: LutTexture,
    settings: BloomSettings,
}

impl BloomLutPass {
    /// The grading table must already be on the GPU; the chain does not
    /// assemble until the LUT load completes.
    pub fn new(gpu: &GpuContext, settings: BloomSettings, lut: LutTexture) -> Self {
        let pipeline = FullscreenPipeline::new(
            gpu,
            "Bloom+LUT",
            include_str!("../shaders/bloom_lut.wgsl"),
            &[
                uniform_entry(0),
                texture_entry(1),
                sampler_entry(2),
                texture3d_entry(3),
                sampler_entry(4),
            ],
        );

        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Bloom+LUT Uniforms"),
            size: std::mem::size_of::<BloomLutUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            uniform_buffer,
            sampler: linear_sampler(gpu, "Bloom+LUT Sampler"),
            lut,
            settings,
        }
    }
}

impl EffectPass for BloomLutPass {
    fn label(&self) -> &'static str {
        "bloom_lut"
    }

    fn execute(
        &mut self,
        ctx: &mut FrameContext,
        input: Option<&wgpu::TextureView>,
        target: &wgpu::TextureView,
    ) {
        let input = input.expect("bloom requires an upstream color input");

        let uniforms = BloomLutUniforms {
            resolution: [ctx.gpu.width() as f32, ctx.gpu.height() as f32],
            intensity: self.settings.intensity,
            luminance_threshold: self.settings.luminance_threshold,
            luminance_smoothing: self.settings.luminance_smoothing,
            lut_size: self.lut.size as f32,
            _pad: [0.0; 2],
        };
        ctx.gpu
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let bind_group = ctx.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bloom+LUT Bind Group"),
            layout: &self.pipeline.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(input),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&self.lut.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&self.lut.sampler),
                },
            ],
        });

        self.pipeline
            .draw(ctx.encoder, "Bloom+LUT Pass", &[target], &bind_group);
    }
}
