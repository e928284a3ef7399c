//! # Sandbox Engine
//!
//! Core of a first-person level walker: load a level mesh, keep the player
//! out of it, and follow the terrain underfoot.
//!
//! ## Features
//!
//! - **Collision**: Sphere-vs-triangle push-out and downward ground rays against a static triangle soup
//! - **Character Controller**: Keyboard/mouse movement with optional terrain following
//! - **Assets**: Wavefront OBJ geometry and MTL materials
//! - **Configuration**: TOML/RON files for every subsystem
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sandbox_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SandboxConfig::default();
//!     let level = Mesh::plane(Vec3::zeros(), 20.0);
//!
//!     let mut collision = CollisionSystem::from_config(&config.collision);
//!     collision.load_mesh_collision(&level)?;
//!
//!     let mut camera = Camera::from_config(Vec3::zeros(), 16.0 / 9.0, &config.camera);
//!     let mut player = CharacterController::new(Vec3::zeros(), config.controller.clone());
//!     let mut input = InputState::new();
//!
//!     input.handle_key_input(KeyCode::W, true);
//!     player.update(&mut input, &mut camera, &collision, 1.0 / 60.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_precision_loss)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod assets;
pub mod render;
pub mod input;
pub mod physics;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{MtlData, MtlParser, ObjError, ObjLoader},
        core::config::{
            CameraConfig, CollisionConfig, Config, ConfigError, ConfigFormat, ControllerConfig,
            EngineConfig, SandboxConfig,
        },
        foundation::{
            math::{Mat4, Vec2, Vec3, WORLD_UP},
            time::{SimulationClock, Stopwatch},
        },
        input::{InputState, KeyCode, MovementKeys},
        physics::{CharacterController, CollisionError, CollisionSystem, Resolution, TriangleSource},
        render::{Camera, Mesh, MoveDirection, Vertex},
    };
}
