//! Temporal reprojection anti-aliasing.
//!
//! Reprojects the previous frame's accumulated color through the velocity
//! buffer and blends it with the current frame, with neighborhood clamping
//! to reject stale history. Writes the blended result to the chain target
//! and a history buffer in a single dual-target draw.
//!
//! History is double-buffered: each frame samples one history target and
//! renders into the other, then the roles swap. A single buffer would be
//! bound as both texture and color attachment in the same render pass,
//! which wgpu rejects (COLOR_TARGET is an exclusive usage).

use crate::gpu::GpuContext;
use crate::pipeline::fullscreen::{
    linear_sampler, sampler_entry, texture_entry, uniform_entry, FullscreenPipeline,
};
use crate::pipeline::pass::{EffectPass, FrameContext};
use crate::pipeline::target::RenderTarget;

#[derive(Clone, Copy, Debug)]
pub struct TraaSettings {
    /// Accumulate toward the full history weight instead of a fixed blend.
    pub full_accumulate: bool,
    /// History weight once converged.
    pub blend: f32,
}

impl Default for TraaSettings {
    fn default() -> Self {
        Self {
            full_accumulate: true,
            blend: 0.9,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct TraaUniforms {
    resolution: [f32; 2],
    blend: f32,
    /// 0 on the first frame after a reset, so history is ignored.
    history_valid: u32,
}

/// History slots for a frame: (sampled, rendered). Alternates so the two
/// never name the same buffer within one pass.
fn history_slots(frame: u64) -> (usize, usize) {
    let read = (frame % 2) as usize;
    (read, 1 - read)
}

pub struct TraaPass {
    pipeline: FullscreenPipeline,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    history: [RenderTarget; 2],
    history_valid: bool,
    settings: TraaSettings,
    frame: u64,
}

impl TraaPass {
    const HISTORY_LABELS: [&'static str; 2] = ["TRAA History A", "TRAA History B"];

    pub fn new(gpu: &GpuContext, settings: TraaSettings) -> Self {
        let pipeline = FullscreenPipeline::new_dual_target(
            gpu,
            "TRAA",
            include_str!("../shaders/traa.wgsl"),
            &[
                uniform_entry(0),
                texture_entry(1),
                sampler_entry(2),
                texture_entry(3), // velocity
                texture_entry(4), // history
            ],
        );

        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("TRAA Uniforms"),
            size: std::mem::size_of::<TraaUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            uniform_buffer,
            sampler: linear_sampler(gpu, "TRAA Sampler"),
            history: [
                RenderTarget::new(gpu, Self::HISTORY_LABELS[0]),
                RenderTarget::new(gpu, Self::HISTORY_LABELS[1]),
            ],
            history_valid: false,
            settings,
            frame: 0,
        }
    }
}

impl EffectPass for TraaPass {
    fn label(&self) -> &'static str {
        "traa"
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
        let input = input.expect("traa requires an upstream color input");
        let (read, write) = history_slots(self.frame);

        // Ramp the history weight up from zero when accumulation restarts.
        let blend = if self.settings.full_accumulate {
            let n = self.frame.min(32) as f32;
            (n / (n + 1.0)).min(self.settings.blend)
        } else {
            self.settings.blend
        };

        let uniforms = TraaUniforms {
            resolution: [ctx.gpu.width() as f32, ctx.gpu.height() as f32],
            blend,
            history_valid: self.history_valid as u32,
        };
        ctx.gpu
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let bind_group = ctx.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("TRAA Bind Group"),
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
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(&self.history[read].view),
                },
            ],
        });

        self.pipeline.draw(
            ctx.encoder,
            "TRAA Pass",
            &[target, &self.history[write].view],
            &bind_group,
        );

        self.history_valid = true;
        self.frame = self.frame.wrapping_add(1);
    }

    fn resize(&mut self, gpu: &GpuContext) {
        for (target, label) in self.history.iter_mut().zip(Self::HISTORY_LABELS) {
            target.ensure_size(gpu, label);
        }
        // Old history no longer matches the new framing.
        self.history_valid = false;
        self.frame = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampled_and_rendered_history_never_alias() {
        for frame in 0..16 {
            let (read, write) = history_slots(frame);
            assert_ne!(read, write, "frame {frame} binds one buffer both ways");
        }
    }

    #[test]
    fn rendered_history_is_sampled_next_frame() {
        for frame in 0..16 {
            let (_, write) = history_slots(frame);
            let (read, _) = history_slots(frame + 1);
            assert_eq!(write, read);
        }
    }
}
