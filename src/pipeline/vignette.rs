//! Corner-darkening vignette.
//!
//! Constructed but registered disabled by default, in the same detached
//! wiring as motion blur and lens distortion.

use crate::gpu::GpuContext;
use crate::pipeline::fullscreen::{
    linear_sampler, sampler_entry, texture_entry, uniform_entry, FullscreenPipeline,
};
use crate::pipeline::pass::{EffectPass, FrameContext};

#[derive(Clone, Copy, Debug)]
pub struct VignetteSettings {
    /// How dark the corners get, in `[0, 1]`.
    pub darkness: f32,
    /// Radial falloff start; larger values pull the darkening inward.
    pub offset: f32,
}

impl Default for VignetteSettings {
    fn default() -> Self {
        Self {
            darkness: 0.8,
            offset: 0.3,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct VignetteUniforms {
    darkness: f32,
    offset: f32,
    _pad: [f32; 2],
}

pub struct VignettePass {
    pipeline: FullscreenPipeline,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    settings: VignetteSettings,
}

impl VignettePass {
    pub fn new(gpu: &GpuContext, settings: VignetteSettings) -> Self {
        let pipeline = FullscreenPipeline::new(
            gpu,
            "Vignette",
            include_str!("../shaders/vignette.wgsl"),
            &[uniform_entry(0), texture_entry(1), sampler_entry(2)],
        );

        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Vignette Uniforms"),
            size: std::mem::size_of::<VignetteUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            uniform_buffer,
            sampler: linear_sampler(gpu, "Vignette Sampler"),
            settings,
        }
    }
}

impl EffectPass for VignettePass {
    fn label(&self) -> &'static str {
        "vignette"
    }

    fn execute(
        &mut self,
        ctx: &mut FrameContext,
        input: Option<&wgpu::TextureView>,
        target: &wgpu::TextureView,
    ) {
        let input = input.expect("vignette requires an upstream color input");

        let uniforms = VignetteUniforms {
            darkness: self.settings.darkness,
            offset: self.settings.offset,
            _pad: [0.0; 2],
        };
        ctx.gpu
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let bind_group = ctx.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Vignette Bind Group"),
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
            .draw(ctx.encoder, "Vignette Pass", &[target], &bind_group);
    }
}
