//! Core primitive types for rendering
//!
//! Meshes, vertices and the first-person camera. Nothing here talks to a
//! graphics backend.

pub mod mesh;
pub mod camera;

// Re-export commonly used types
pub use mesh::{Mesh, Vertex};
pub use camera::{Camera, MoveDirection, OrbitAxis};
