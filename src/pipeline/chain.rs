//! The frozen effect chain and its per-frame execution.

use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::pipeline::pass::{EffectPass, FrameContext};
use crate::pipeline::target::{GeometryBuffers, RenderTarget};

/// An ordered, frozen sequence of effect passes.
///
/// Built by [`PassRegistry::into_chain`](super::PassRegistry::into_chain);
/// append-only during setup and immutable afterwards. Each frame the chain
/// ping-pongs two half-float targets through the passes, then resolves the
/// last output onto the sRGB surface:
///
/// ```text
/// Pass 0: None     → Target A
/// Pass 1: Target A → Target B
/// Pass 2: Target B → Target A
/// ...
/// Blit:   last     → Screen
/// ```
pub struct EffectChain {
    passes: Vec<Box<dyn EffectPass>>,
    target_a: RenderTarget,
    target_b: RenderTarget,
    geometry: GeometryBuffers,
    blit: BlitPass,
}

impl EffectChain {
    pub(crate) fn new(gpu: &GpuContext, passes: Vec<Box<dyn EffectPass>>) -> Self {
        let labels: Vec<_> = passes.iter().map(|p| p.label()).collect();
        log::info!("effect chain assembled: {}", labels.join(" -> "));
        Self {
            passes,
            target_a: RenderTarget::new(gpu, "Chain Target A"),
            target_b: RenderTarget::new(gpu, "Chain Target B"),
            geometry: GeometryBuffers::new(gpu),
            blit: BlitPass::new(gpu),
        }
    }

    /// Execute every pass and present the frame.
    ///
    /// # Panics
    ///
    /// Panics if the surface texture cannot be acquired.
    pub fn execute(&mut self, gpu: &GpuContext, time: f32, camera: &Camera) {
        self.target_a.ensure_size(gpu, "Chain Target A");
        self.target_b.ensure_size(gpu, "Chain Target B");
        self.geometry.ensure_size(gpu);

        let output = gpu.surface.get_current_texture().unwrap();
        let screen_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Effect Chain Encoder"),
            });

        let mut last_output: Option<&wgpu::TextureView> = None;
        {
            let geometry = &self.geometry;
            let mut input: Option<&wgpu::TextureView> = None;
            for (i, pass) in self.passes.iter_mut().enumerate() {
                let target = if i % 2 == 0 {
                    &self.target_a.view
                } else {
                    &self.target_b.view
                };

                let mut ctx = FrameContext {
                    gpu,
                    encoder: &mut encoder,
                    time,
                    camera,
                    geometry,
                };
                pass.execute(&mut ctx, input, target);

                input = Some(target);
                last_output = Some(target);
            }
        }

        if let Some(source) = last_output {
            self.blit.blit(gpu, &mut encoder, source, &screen_view);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Resize every internal buffer after a surface reconfiguration.
    pub fn resize(&mut self, gpu: &GpuContext) {
        self.target_a.ensure_size(gpu, "Chain Target A");
        self.target_b.ensure_size(gpu, "Chain Target B");
        self.geometry.ensure_size(gpu);
        for pass in &mut self.passes {
            pass.resize(gpu);
        }
    }

    /// Mutable access to a pass that opted into post-assembly updates.
    pub fn pass_mut<T: EffectPass + 'static>(&mut self) -> Option<&mut T> {
        self.passes
            .iter_mut()
            .find_map(|p| p.as_any_mut().and_then(|any| any.downcast_mut::<T>()))
    }
}

/// Resolves the final half-float target onto the surface.
///
/// Kept inside the chain rather than registered as a pass: every effect
/// pipeline targets the HDR format, and the sRGB encode happens for free on
/// the surface write.
struct BlitPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl BlitPass {
    fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/blit.wgsl").into()),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Blit Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Blit Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
            sampler,
        }
    }

    fn blit(
        &self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        source: &wgpu::TextureView,
        target: &wgpu::TextureView,
    ) {
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blit Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Blit Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
