//! Render targets and the shared geometry buffers.

use crate::gpu::{GpuContext, HDR_FORMAT};

/// An off-screen half-float render target.
///
/// Used both for the chain's ping-pong buffers and for pass-internal history
/// targets. Can be rendered to and sampled in a later pass.
pub struct RenderTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl RenderTarget {
    pub fn new(gpu: &GpuContext, label: &str) -> Self {
        Self::with_format(gpu, label, HDR_FORMAT)
    }

    pub fn with_format(gpu: &GpuContext, label: &str, format: wgpu::TextureFormat) -> Self {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width: gpu.width(),
            height: gpu.height(),
        }
    }

    /// Recreate the texture if the surface size changed. Identical
    /// dimensions leave the target untouched.
    pub fn ensure_size(&mut self, gpu: &GpuContext, label: &str) {
        if self.width != gpu.width() || self.height != gpu.height() {
            let format = self.texture.format();
            *self = Self::with_format(gpu, label, format);
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// The shared per-frame auxiliary buffers: world normal, screen-space
/// velocity, and depth.
///
/// Produced once per frame by the geometry pass and sampled by SSGI, TRAA,
/// and motion blur. The chain owns one set and hands it to every pass via
/// [`FrameContext`](super::FrameContext).
pub struct GeometryBuffers {
    pub normal: RenderTarget,
    pub velocity: RenderTarget,
    pub depth_texture: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
}

impl GeometryBuffers {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(gpu: &GpuContext) -> Self {
        let (depth_texture, depth_view) = Self::create_depth(gpu);
        Self {
            normal: RenderTarget::new(gpu, "GBuffer Normal"),
            velocity: RenderTarget::new(gpu, "GBuffer Velocity"),
            depth_texture,
            depth_view,
        }
    }

    fn create_depth(gpu: &GpuContext) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("GBuffer Depth"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Match the buffers to the current surface size.
    pub fn ensure_size(&mut self, gpu: &GpuContext) {
        self.normal.ensure_size(gpu, "GBuffer Normal");
        self.velocity.ensure_size(gpu, "GBuffer Velocity");
        if self.depth_texture.width() != gpu.width() || self.depth_texture.height() != gpu.height()
        {
            let (texture, view) = Self::create_depth(gpu);
            self.depth_texture = texture;
            self.depth_view = view;
        }
    }
}
