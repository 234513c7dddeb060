//! The effect pass trait and per-frame execution context.

use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::pipeline::target::GeometryBuffers;

/// Execution context handed to each pass while the chain runs.
///
/// Lifetimes tie every reference to the frame's scope; passes cannot hold
/// onto resources across frames through the context.
pub struct FrameContext<'a> {
    pub gpu: &'a GpuContext,
    /// Command encoder the pass appends its work to.
    pub encoder: &'a mut wgpu::CommandEncoder,
    /// Elapsed time in seconds since the viewer started.
    pub time: f32,
    pub camera: &'a Camera,
    /// The shared velocity/depth/normal buffers for this frame.
    pub geometry: &'a GeometryBuffers,
}

/// One stage of the effect chain.
///
/// A pass is configured entirely at construction; after the registry freezes
/// the chain, only `execute` and `resize` are called. Passes declare their
/// relationship to the shared geometry buffers so the registry can enforce
/// producer-before-consumer ordering.
pub trait EffectPass {
    fn label(&self) -> &'static str;

    /// True when this pass fills the shared velocity/depth/normal buffers.
    fn produces_geometry(&self) -> bool {
        false
    }

    /// True when this pass samples the shared geometry buffers.
    fn consumes_geometry(&self) -> bool {
        false
    }

    /// Record this pass's work.
    ///
    /// `input` is the previous pass's output, or `None` for the first pass
    /// in the chain. `target` is the half-float buffer to write.
    fn execute(
        &mut self,
        ctx: &mut FrameContext,
        input: Option<&wgpu::TextureView>,
        target: &wgpu::TextureView,
    );

    /// Recreate any internal targets after a surface resize. Default: none.
    fn resize(&mut self, _gpu: &GpuContext) {}

    /// Opt-in downcast hook for passes that accept state after the chain has
    /// been frozen (the geometry pass takes the environment map whenever its
    /// load completes). Default: not downcastable.
    fn as_any_mut(&mut self) -> Option<&mut dyn std::any::Any> {
        None
    }
}
