//! Contrast-adaptive sharpening, applied after TRAA to recover the detail
//! the temporal blend softens.

use crate::gpu::GpuContext;
use crate::pipeline::fullscreen::{
    linear_sampler, sampler_entry, texture_entry, uniform_entry, FullscreenPipeline,
};
use crate::pipeline::pass::{EffectPass, FrameContext};

#[derive(Clone, Copy, Debug)]
pub struct SharpenSettings {
    /// Kernel strength in `[0, 1]`.
    pub sharpness: f32,
}

impl Default for SharpenSettings {
    fn default() -> Self {
        Self { sharpness: 0.75 }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SharpenUniforms {
    resolution: [f32; 2],
    sharpness: f32,
    _pad: f32,
}

pub struct SharpenPass {
    pipeline: FullscreenPipeline,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    settings: SharpenSettings,
}

impl SharpenPass {
    pub fn new(gpu: &GpuContext, settings: SharpenSettings) -> Self {
        let pipeline = FullscreenPipeline::new(
            gpu,
            "Sharpen",
            include_str!("../shaders/sharpen.wgsl"),
            &[uniform_entry(0), texture_entry(1), sampler_entry(2)],
        );

        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sharpen Uniforms"),
            size: std::mem::size_of::<SharpenUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            uniform_buffer,
            sampler: linear_sampler(gpu, "Sharpen Sampler"),
            settings,
        }
    }
}

impl EffectPass for SharpenPass {
    fn label(&self) -> &'static str {
        "sharpen"
    }

    fn execute(
        &mut self,
        ctx: &mut FrameContext,
        input: Option<&wgpu::TextureView>,
        target: &wgpu::TextureView,
    ) {
        let input = input.expect("sharpen requires an upstream color input");

        let uniforms = SharpenUniforms {
            resolution: [ctx.gpu.width() as f32, ctx.gpu.height() as f32],
            sharpness: self.settings.sharpness,
            _pad: 0.0,
        };
        ctx.gpu
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let bind_group = ctx.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sharpen Bind Group"),
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
            .draw(ctx.encoder, "Sharpen Pass", &[target], &bind_group);
    }
}
