//! # Rendering System
//!
//! Backend-agnostic rendering data: meshes shared with the collision
//! system and the first-person camera that drives both the view and the
//! player's movement directions.
//!
//! GPU submission lives outside this crate; everything here is plain data
//! and matrix math.

// Core primitives
pub mod primitives;

// Core rendering types that applications need
pub use primitives::{Camera, Mesh, MoveDirection, OrbitAxis, Vertex};
