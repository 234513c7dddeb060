//! glTF model decoding.
//!
//! Decoding happens on a loader thread and produces CPU-side [`ModelData`];
//! GPU upload happens later on the event-loop thread once a device exists.

use glam::{Mat4, Vec3};

use crate::error::LoadError;
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex3d};
use crate::scene::Aabb;

/// One decoded glTF primitive with its flattened node transform.
pub struct MeshData {
    pub vertices: Vec<Vertex3d>,
    pub indices: Vec<u32>,
    pub transform: Mat4,
    pub base_color: [f32; 4],
    pub roughness: f32,
    pub metallic: f32,
}

/// A decoded model: every drawable primitive of the default scene.
pub struct ModelData {
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    /// Decode a `.glb` / `.gltf` byte buffer.
    pub fn decode(bytes: &[u8]) -> Result<Self, LoadError> {
        let (document, buffers, _images) =
            gltf::import_slice(bytes).map_err(|e| LoadError::decode("glTF model", e))?;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| LoadError::decode("glTF model", "file contains no scene"))?;

        let mut meshes = Vec::new();
        for node in scene.nodes() {
            collect_node(&node, Mat4::IDENTITY, &buffers, &mut meshes)?;
        }

        if meshes.is_empty() {
            return Err(LoadError::decode("glTF model", "scene has no geometry"));
        }

        log::debug!("decoded model: {} primitive(s)", meshes.len());
        Ok(Self { meshes })
    }

    /// Bounding box over every vertex, with node transforms applied.
    pub fn bounds(&self) -> Aabb {
        self.meshes
            .iter()
            .map(|mesh| {
                Aabb::from_points(
                    mesh.vertices
                        .iter()
                        .map(|v| mesh.transform.transform_point3(Vec3::from(v.position))),
                )
            })
            .fold(Aabb::EMPTY, |acc, mesh_bounds| acc.union(&mesh_bounds))
    }

    /// Upload every primitive to the GPU.
    pub fn upload(&self, gpu: &GpuContext) -> Vec<Mesh> {
        self.meshes
            .iter()
            .map(|m| {
                Mesh::new(
                    gpu,
                    &m.vertices,
                    &m.indices,
                    m.transform,
                    m.base_color,
                    m.roughness,
                    m.metallic,
                )
            })
            .collect()
    }
}

fn collect_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<MeshData>,
) -> Result<(), LoadError> {
    let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            out.push(decode_primitive(&primitive, transform, buffers)?);
        }
    }

    for child in node.children() {
        collect_node(&child, transform, buffers, out)?;
    }
    Ok(())
}

fn decode_primitive(
    primitive: &gltf::Primitive,
    transform: Mat4,
    buffers: &[gltf::buffer::Data],
) -> Result<MeshData, LoadError> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| &b.0[..]));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| LoadError::decode("glTF model", "primitive has no positions"))?
        .collect();

    let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|n| n.collect());
    let uvs: Option<Vec<[f32; 2]>> = reader.read_tex_coords(0).map(|t| t.into_f32().collect());

    let indices: Vec<u32> = match reader.read_indices() {
        Some(read) => read.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let mut vertices: Vec<Vertex3d> = positions
        .iter()
        .enumerate()
        .map(|(i, &position)| {
            Vertex3d::new(
                position,
                normals.as_ref().map_or([0.0; 3], |n| n[i]),
                uvs.as_ref().map_or([0.0; 2], |t| t[i]),
            )
        })
        .collect();

    if normals.is_none() {
        compute_flat_normals(&mut vertices, &indices);
    }

    let pbr = primitive.material().pbr_metallic_roughness();

    Ok(MeshData {
        vertices,
        indices,
        transform,
        base_color: pbr.base_color_factor(),
        roughness: pbr.roughness_factor(),
        metallic: pbr.metallic_factor(),
    })
}

/// Area-weighted face normals accumulated per vertex, for primitives that
/// ship without normals.
fn compute_flat_normals(vertices: &mut [Vertex3d], indices: &[u32]) {
    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let p0 = Vec3::from(vertices[i0].position);
        let p1 = Vec3::from(vertices[i1].position);
        let p2 = Vec3::from(vertices[i2].position);
        let face = (p1 - p0).cross(p2 - p0);
        for &i in &[i0, i1, i2] {
            let n = Vec3::from(vertices[i].normal) + face;
            vertices[i].normal = n.to_array();
        }
    }
    for v in vertices {
        let n = Vec3::from(v.normal).normalize_or(Vec3::Y);
        v.normal = n.to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad() -> (Vec<Vertex3d>, Vec<u32>) {
        let vertices = vec![
            Vertex3d::new([0.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
            Vertex3d::new([1.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
            Vertex3d::new([1.0, 0.0, 1.0], [0.0; 3], [0.0; 2]),
            Vertex3d::new([0.0, 0.0, 1.0], [0.0; 3], [0.0; 2]),
        ];
        (vertices, vec![0, 2, 1, 0, 3, 2])
    }

    #[test]
    fn flat_normals_point_up_for_a_ground_quad() {
        let (mut vertices, indices) = quad();
        compute_flat_normals(&mut vertices, &indices);
        for v in &vertices {
            assert_relative_eq!(v.normal[1], 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn bounds_apply_node_transforms() {
        let (vertices, indices) = quad();
        let model = ModelData {
            meshes: vec![MeshData {
                vertices,
                indices,
                transform: Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)),
                base_color: [1.0; 4],
                roughness: 1.0,
                metallic: 0.0,
            }],
        };
        let bounds = model.bounds();
        assert_relative_eq!(bounds.min.x, 10.0);
        assert_relative_eq!(bounds.max.x, 11.0);
    }
}
