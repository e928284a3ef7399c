//! Collision mesh representations
//!
//! Turns a render mesh's interleaved vertex buffer and triangle index buffer
//! into a flat triangle soup with precomputed face normals.

use thiserror::Error;

use crate::foundation::math::Vec3;
use super::primitives::Triangle;

/// Number of `f32` values per interleaved vertex: position (3), uv (2), normal (3)
pub const VERTEX_STRIDE: usize = 8;

/// Errors raised while building collision geometry from a mesh
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollisionError {
    /// A triangle references a vertex that does not exist
    #[error("Triangle {triangle} references vertex {index}, but the mesh only has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending vertex index
        index: u32,
        /// Number of complete vertices in the vertex buffer
        vertex_count: usize,
        /// Triangle the index belongs to
        triangle: usize,
    },

    /// The index buffer does not describe whole triangles
    #[error("Index count {count} is not a multiple of 3")]
    IndexCountNotMultipleOfThree {
        /// Length of the index buffer
        count: usize,
    },
}

/// Source of triangle geometry for collision
///
/// Implemented by meshes that expose an interleaved vertex buffer with a
/// fixed stride of [`VERTEX_STRIDE`] floats (position first) and a flat
/// `u32` triangle index buffer.
pub trait TriangleSource {
    /// Interleaved vertex data
    fn vertex_data(&self) -> &[f32];

    /// Triangle indices, three per triangle
    fn index_data(&self) -> &[u32];
}

/// The static collision mesh: an ordered list of triangles
///
/// Triangles are only handed out by reference; the whole list is replaced
/// when a new mesh is loaded.
#[derive(Debug, Clone, Default)]
pub struct TriangleStore {
    triangles: Vec<Triangle>,
}

impl TriangleStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a mesh
    ///
    /// Every consecutive index triple becomes one triangle. A trailing partial
    /// triple is dropped with a warning, or rejected when `strict_index_count`
    /// is set. Indices past the end of the vertex buffer are always rejected.
    pub fn from_source<S: TriangleSource + ?Sized>(
        source: &S,
        strict_index_count: bool,
    ) -> Result<Self, CollisionError> {
        let vertices = source.vertex_data();
        let indices = source.index_data();
        let vertex_count = vertices.len() / VERTEX_STRIDE;

        let remainder = indices.len() % 3;
        if remainder != 0 {
            if strict_index_count {
                return Err(CollisionError::IndexCountNotMultipleOfThree { count: indices.len() });
            }
            log::warn!(
                "Collision mesh index count {} is not a multiple of 3, dropping {} trailing index(es)",
                indices.len(),
                remainder
            );
        }

        let position = |index: u32, triangle: usize| -> Result<Vec3, CollisionError> {
            let i = index as usize;
            if i >= vertex_count {
                return Err(CollisionError::IndexOutOfRange { index, vertex_count, triangle });
            }
            let base = i * VERTEX_STRIDE;
            Ok(Vec3::new(vertices[base], vertices[base + 1], vertices[base + 2]))
        };

        let mut triangles = Vec::with_capacity(indices.len() / 3);
        for (triangle, chunk) in indices.chunks_exact(3).enumerate() {
            let v0 = position(chunk[0], triangle)?;
            let v1 = position(chunk[1], triangle)?;
            let v2 = position(chunk[2], triangle)?;
            triangles.push(Triangle::new(v0, v1, v2));
        }

        Ok(Self { triangles })
    }

    /// Number of triangles
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the store holds no triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Triangles in load order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Iterate over the triangles in load order
    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }
}

impl<'a> IntoIterator for &'a TriangleStore {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
