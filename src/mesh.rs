//! GPU mesh resources.
//!
//! [`Vertex3d`] is the vertex format shared by every mesh the viewer draws
//! (32 bytes: position, normal, UV), and [`Mesh`] owns the uploaded vertex
//! and index buffers together with the material color and node transform.

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::gpu::GpuContext;

/// A vertex with position, normal, and texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// The wgpu vertex buffer layout for this vertex type: position at
    /// location 0, normal at 1, uv at 2, 32-byte stride.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// GPU-resident geometry with its node transform and base color.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    /// Model-space transform of the glTF node this mesh came from.
    pub transform: Mat4,
    /// Linear RGBA base color factor from the material.
    pub base_color: [f32; 4],
    /// Perceptual roughness factor, used by the environment shading.
    pub roughness: f32,
    /// Metallic factor.
    pub metallic: f32,
}

impl Mesh {
    pub fn new(
        gpu: &GpuContext,
        vertices: &[Vertex3d],
        indices: &[u32],
        transform: Mat4,
        base_color: [f32; 4],
        roughness: f32,
        metallic: f32,
    ) -> Self {
        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertices"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Indices"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            transform,
            base_color,
            roughness,
            metallic,
        }
    }
}
