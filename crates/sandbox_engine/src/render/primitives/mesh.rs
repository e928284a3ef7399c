//! Mesh representation for level geometry
//!
//! Interleaved vertex buffer plus triangle indices. The same buffers feed the
//! renderer and the collision system: [`Mesh`] implements
//! [`TriangleSource`], exposing its vertices as a flat `f32` slice with a
//! stride of [`VERTEX_STRIDE`] floats.

use crate::foundation::math::Vec3;
use crate::physics::collision::{TriangleSource, VERTEX_STRIDE};

/// Interleaved vertex: position, texture coordinate, normal
///
/// # Memory Layout
/// `#[repr(C)]` with only `f32` fields, so a vertex slice can be viewed as
/// plain floats for GPU upload and collision extraction alike.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],

    /// Normal vector
    pub normal: [f32; 3],
}

const _: () = assert!(std::mem::size_of::<Vertex>() == VERTEX_STRIDE * std::mem::size_of::<f32>());

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], tex_coord: [f32; 2], normal: [f32; 3]) -> Self {
        Self { position, tex_coord, normal }
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data, three per triangle
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of complete triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a planar quad as two triangles
    ///
    /// Corners go counter-clockwise when seen from the side the face should
    /// point to; the normal is derived from that winding.
    pub fn push_quad(&mut self, corners: [Vec3; 4]) {
        let normal = (corners[1] - corners[0])
            .cross(&(corners[2] - corners[0]))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros);
        let tex_coords = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

        let base = self.vertices.len() as u32;
        for (corner, tex_coord) in corners.iter().zip(tex_coords) {
            self.vertices.push(Vertex::new((*corner).into(), tex_coord, normal.into()));
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Append another mesh, offsetting its indices
    pub fn append(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Horizontal upward-facing square centered at `center`
    pub fn plane(center: Vec3, half_size: f32) -> Self {
        let mut mesh = Self::default();
        mesh.push_quad([
            center + Vec3::new(-half_size, 0.0, half_size),
            center + Vec3::new(half_size, 0.0, half_size),
            center + Vec3::new(half_size, 0.0, -half_size),
            center + Vec3::new(-half_size, 0.0, -half_size),
        ]);
        mesh
    }

    /// Axis-aligned box with outward-facing sides
    pub fn cuboid(center: Vec3, half_extents: Vec3) -> Self {
        let mut mesh = Self::default();
        let axes = [Vec3::x(), -Vec3::x(), Vec3::y(), -Vec3::y(), Vec3::z(), -Vec3::z()];

        for normal in axes {
            // u x v = normal, so the corner order below winds outward
            let v = if normal.y.abs() > 0.5 { Vec3::new(0.0, 0.0, -1.0) } else { Vec3::y() };
            let u = v.cross(&normal);

            let face = center + normal.component_mul(&half_extents);
            let u = u.component_mul(&half_extents);
            let v = v.component_mul(&half_extents);
            mesh.push_quad([face - u - v, face + u - v, face + u + v, face - u + v]);
        }
        mesh
    }

    /// Unit cube centered at the origin (corners at ±1)
    pub fn cube() -> Self {
        Self::cuboid(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))
    }
}

impl TriangleSource for Mesh {
    fn vertex_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    fn index_data(&self) -> &[u32] {
        &self.indices
    }
}
