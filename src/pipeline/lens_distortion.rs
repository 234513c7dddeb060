//! Barrel distortion with chromatic aberration.
//!
//! Constructed but registered disabled by default, like motion blur.

use crate::gpu::GpuContext;
use crate::pipeline::fullscreen::{
    linear_sampler, sampler_entry, texture_entry, uniform_entry, FullscreenPipeline,
};
use crate::pipeline::pass::{EffectPass, FrameContext};

#[derive(Clone, Copy, Debug)]
pub struct LensDistortionSettings {
    /// Barrel distortion amount; negative values pincushion.
    pub distortion: f32,
    /// Per-channel refraction offset strength.
    pub aberration: f32,
}

impl Default for LensDistortionSettings {
    fn default() -> Self {
        Self {
            distortion: 0.15,
            aberration: 1.0,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LensDistortionUniforms {
    distortion: f32,
    aberration: f32,
    _pad: [f32; 2],
}

pub struct LensDistortionPass {
    pipeline: FullscreenPipeline,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    settings: LensDistortionSettings,
}

impl LensDistortionPass {
    pub fn new(gpu: &GpuContext, settings: LensDistortionSettings) -> Self {
        let pipeline = FullscreenPipeline::new(
            gpu,
            "Lens Distortion",
            include_str!("../shaders/lens_distortion.wgsl"),
            &[uniform_entry(0), texture_entry(1), sampler_entry(2)],
        );

        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Lens Distortion Uniforms"),
            size: std::mem::size_of::<LensDistortionUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            uniform_buffer,
            sampler: linear_sampler(gpu, "Lens Distortion Sampler"),
            settings,
        }
    }
}

impl EffectPass for LensDistortionPass {
    fn label(&self) -> &'static str {
        "lens_distortion"
    }

    fn execute(
        &mut self,
        ctx: &mut FrameContext,
        input: Option<&wgpu::TextureView>,
        target: &wgpu::TextureView,
    ) {
        let input = input.expect("lens distortion requires an upstream color input");

        let uniforms = LensDistortionUniforms {
            distortion: self.settings.distortion,
            aberration: self.settings.aberration,
            _pad: [0.0; 2],
        };
        ctx.gpu
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let bind_group = ctx.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Lens Distortion Bind Group"),
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
            ],
        });

        self.pipeline
            .draw(ctx.encoder, "Lens Distortion Pass", &[target], &bind_group);
    }
}
