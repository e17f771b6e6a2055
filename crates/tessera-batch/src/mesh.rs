//! Mesh data: vertices and triangle indices, plus transform baking and appending.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};

/// A single mesh vertex, laid out for direct GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
}

/// Unit cube face table: normal, then the two in-plane axes (u, v) with `u x v = normal`.
const CUBE_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
];

/// Triangle mesh with `u32` indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Vertex buffer.
    pub vertices: Vec<Vertex>,
    /// Index buffer (3 indices per triangle).
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis-aligned unit cube centered on the origin (24 vertices, 12 triangles).
    pub fn unit_cube() -> Self {
        let mut mesh = Self::new();
        for (normal, u, v) in CUBE_FACES {
            let (n, u, v) = (Vec3::from(normal), Vec3::from(u), Vec3::from(v));
            let center = n * 0.5;
            let corners = [
                center - u * 0.5 - v * 0.5,
                center + u * 0.5 - v * 0.5,
                center + u * 0.5 + v * 0.5,
                center - u * 0.5 + v * 0.5,
            ];
            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend(corners.iter().map(|p| Vertex {
                position: p.to_array(),
                normal,
            }));
            // CCW when viewed from outside.
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Copy of this mesh with `transform` applied to positions and normals.
    pub fn baked(&self, transform: &Mat4) -> MeshData {
        let normal_matrix = Mat3::from_mat4(*transform).inverse().transpose();
        let vertices = self
            .vertices
            .iter()
            .map(|v| Vertex {
                position: transform
                    .transform_point3(Vec3::from(v.position))
                    .to_array(),
                normal: (normal_matrix * Vec3::from(v.normal))
                    .normalize_or_zero()
                    .to_array(),
            })
            .collect();
        MeshData {
            vertices,
            indices: self.indices.clone(),
        }
    }

    /// Append `other`, rebasing its indices onto this mesh's vertices.
    pub fn append(&mut self, other: &MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Raw vertex bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh() {
        let mesh = MeshData::new();
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_unit_cube_counts_and_bounds() {
        let cube = MeshData::unit_cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        for v in &cube.vertices {
            assert!(v.position.iter().all(|c| c.abs() <= 0.5 + 1e-6));
        }
    }

    #[test]
    fn test_cube_faces_wind_outward() {
        let cube = MeshData::unit_cube();
        for tri in cube.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(cube.vertices[i as usize].position));
            let face_normal = (b - a).cross(c - a).normalize();
            let stored = Vec3::from(cube.vertices[tri[0] as usize].normal);
            assert!(face_normal.dot(stored) > 0.99, "triangle {tri:?} winds inward");
        }
    }

    #[test]
    fn test_bake_translates_and_scales() {
        let cube = MeshData::unit_cube();
        let transform = Mat4::from_scale_rotation_translation(
            Vec3::new(1.0, 4.0, 1.0),
            glam::Quat::IDENTITY,
            Vec3::new(3.0, 2.0, -1.0),
        );
        let baked = cube.baked(&transform);
        let max_y = baked
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        assert!((max_y - 4.0).abs() < 1e-5);
        for (orig, moved) in cube.vertices.iter().zip(&baked.vertices) {
            assert!((Vec3::from(orig.normal) - Vec3::from(moved.normal)).length() < 1e-5);
        }
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut mesh = MeshData::unit_cube();
        mesh.append(&MeshData::unit_cube());
        assert_eq!(mesh.vertex_count(), 48);
        assert_eq!(mesh.triangle_count(), 24);
        assert_eq!(*mesh.indices.iter().max().unwrap(), 47);
    }

    #[test]
    fn test_vertex_bytes_stride() {
        let cube = MeshData::unit_cube();
        assert_eq!(cube.vertex_bytes().len(), 24 * std::mem::size_of::<Vertex>());
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }
}
