//! Per-pixel motion blur along the velocity buffer.
//!
//! Constructed with its full parameter set but registered disabled by
//! default; enabling `effects.motion_blur` in the config attaches it after
//! the grading pass.

use crate::gpu::GpuContext;
use crate::pipeline::fullscreen::{
    linear_sampler, sampler_entry, texture_entry, uniform_entry, FullscreenPipeline,
};
use crate::pipeline::pass::{EffectPass, FrameContext};

#[derive(Clone, Copy, Debug)]
pub struct MotionBlurSettings {
    pub intensity: f32,
    /// Sample count along the velocity vector.
    pub samples: u32,
}

impl Default for MotionBlurSettings {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            samples: 16,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MotionBlurUniforms {
    resolution: [f32; 2],
    intensity: f32,
    samples: u32,
}

pub struct MotionBlurPass {
    pipeline: FullscreenPipeline,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    settings: MotionBlurSettings,
}

impl MotionBlurPass {
    pub fn new(gpu: &GpuContext, settings: MotionBlurSettings) -> Self {
        let pipeline = FullscreenPipeline::new(
            gpu,
            "Motion Blur",
            include_str!("../shaders/motion_blur.wgsl"),
            &[
                uniform_entry(0),
                texture_entry(1),
                sampler_entry(2),
                texture_entry(3), // velocity
            ],
        );

        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Motion Blur Uniforms"),
            size: std::mem::size_of::<MotionBlurUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            uniform_buffer,
            sampler: linear_sampler(gpu, "Motion Blur Sampler"),
            settings,
        }
    }
}

impl EffectPass for MotionBlurPass {
    fn label(&self) -> &'static str {
        "motion_blur"
    }

    fn consumes_geometry(&self) -> bool {
        true
    }

    fn execute(
        &mut self,
        ctx: &mut FrameContext,
        input: Option<&wgpu::TextureView>,
        target: &wgpu::TextureView,
    ) {
        let input = input.expect("motion blur requires an upstream color input");

        let uniforms = MotionBlurUniforms {
            resolution: [ctx.gpu.width() as f32, ctx.gpu.height() as f32],
            intensity: self.settings.intensity,
            samples: self.settings.samples,
        };
        ctx.gpu
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let bind_group = ctx.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Motion Blur Bind Group"),
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
                    resource: wgpu::BindingResource::TextureView(&ctx.geometry.velocity.view),
                },
            ],
        });

        self.pipeline
            .draw(ctx.encoder, "Motion Blur Pass", &[target], &bind_group);
    }
}
