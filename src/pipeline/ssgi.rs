//! Screen-space global illumination.
//!
//! Ray-marches the depth buffer for nearby indirect light, blends it with
//! the direct shading, runs a small edge-aware denoise, and applies
//! ACES-filmic tone mapping on the way out. A compact stand-in for a
//! production SSGI implementation; the parameter set mirrors the reference
//! viewer's configuration.

use crate::gpu::GpuContext;
use crate::pipeline::fullscreen::{
    depth_entry, linear_sampler, sampler_entry, texture_entry, uniform_entry, FullscreenPipeline,
};
use crate::pipeline::pass::{EffectPass, FrameContext};

/// SSGI tuning parameters, fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct SsgiSettings {
    /// Maximum world-space ray distance.
    pub distance: f32,
    /// Assumed surface thickness for occlusion tests.
    pub thickness: f32,
    pub denoise_iterations: u32,
    pub denoise_kernel: u32,
    pub denoise_diffuse: f32,
    pub denoise_specular: f32,
    pub radius: f32,
    pub phi: f32,
    pub luma_phi: f32,
    pub depth_phi: f32,
    pub normal_phi: f32,
    pub roughness_phi: f32,
    pub specular_phi: f32,
    pub env_blur: f32,
    pub importance_sampling: bool,
    /// Ray-march step count.
    pub steps: u32,
    /// Binary-search refinement steps after a hit.
    pub refine_steps: u32,
    pub resolution_scale: f32,
    pub missed_rays: bool,
}

impl Default for SsgiSettings {
    fn default() -> Self {
        Self {
            distance: 5.98,
            thickness: 2.83,
            denoise_iterations: 1,
            denoise_kernel: 3,
            denoise_diffuse: 25.0,
            denoise_specular: 25.54,
            radius: 11.0,
            phi: 0.875,
            luma_phi: 20.652,
            depth_phi: 23.37,
            normal_phi: 26.087,
            roughness_phi: 18.478,
            specular_phi: 7.1,
            env_blur: 0.0,
            importance_sampling: true,
            steps: 20,
            refine_steps: 4,
            resolution_scale: 1.0,
            missed_rays: false,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SsgiUniforms {
    resolution: [f32; 2],
    distance: f32,
    thickness: f32,
    radius: f32,
    phi: f32,
    luma_phi: f32,
    depth_phi: f32,
    normal_phi: f32,
    steps: u32,
    refine_steps: u32,
    denoise_kernel: u32,
    importance_sampling: u32,
    time: f32,
    _pad: [f32; 2],
}

pub struct SsgiPass {
    pipeline: FullscreenPipeline,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    settings: SsgiSettings,
}

impl SsgiPass {
    pub fn new(gpu: &GpuContext, settings: SsgiSettings) -> Self {
        let pipeline = FullscreenPipeline::new(
            gpu,
            "SSGI",
            include_str!("../shaders/ssgi.wgsl"),
            &[
                uniform_entry(0),
                texture_entry(1),
                sampler_entry(2),
                texture_entry(3), // world normals
                depth_entry(4),
            ],
        );

        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("SSGI Uniforms"),
            size: std::mem::size_of::<SsgiUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            uniform_buffer,
            sampler: linear_sampler(gpu, "SSGI Sampler"),
            settings,
        }
    }
}

impl EffectPass for SsgiPass {
    fn label(&self) -> &'static str {
        "ssgi"
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
        let input = input.expect("ssgi requires the geometry pass output");

        let s = &self.settings;
        let uniforms = SsgiUniforms {
            resolution: [ctx.gpu.width() as f32, ctx.gpu.height() as f32],
            distance: s.distance,
            thickness: s.thickness,
            radius: s.radius,
            phi: s.phi,
            luma_phi: s.luma_phi,
            depth_phi: s.depth_phi,
            normal_phi: s.normal_phi,
            steps: s.steps,
            refine_steps: s.refine_steps,
            denoise_kernel: s.denoise_kernel,
            importance_sampling: s.importance_sampling as u32,
            time: ctx.time,
            _pad: [0.0; 2],
        };
        ctx.gpu
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let bind_group = ctx.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("SSGI Bind Group"),
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
                    resource: wgpu::BindingResource::TextureView(&ctx.geometry.normal.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(&ctx.geometry.depth_view),
                },
            ],
        });

        self.pipeline
            .draw(ctx.encoder, "SSGI Pass", &[target], &bind_group);
    }
}
