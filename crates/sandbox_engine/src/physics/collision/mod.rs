//! Collision geometry for static level meshes
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays, spheres, triangles and the narrow-phase tests between them
//! - [`mesh`] - Triangle soup built from a mesh's vertex/index buffers
//!
//! # Key Types
//!
//! - [`Triangle`] - Triangle with a precomputed face normal
//! - [`TriangleStore`] - Ordered triangle list owned by the collision system
//! - [`SphereContact`] - Penetration normal/depth from a sphere test

pub mod primitives;
pub mod mesh;

// Re-export commonly used types
pub use primitives::{
    Ray, BoundingSphere, SphereContact, Triangle,
    closest_point_on_triangle, sphere_triangle_collision, ray_triangle_intersection,
};
pub use mesh::{CollisionError, TriangleSource, TriangleStore, VERTEX_STRIDE};
