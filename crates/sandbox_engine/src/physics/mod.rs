//! Physics module for player collision against static level geometry
//!
//! No rigid bodies, friction or restitution: the only dynamic object is the
//! player probe, kept out of the level mesh by positional correction.

pub mod collision;
pub mod collision_system;
pub mod character_controller;

pub use collision::{
    BoundingSphere,
    CollisionError,
    Ray,
    SphereContact,
    Triangle,
    TriangleSource,
    TriangleStore,
};
pub use collision_system::{CollisionSystem, PlayerVolume, Resolution};
pub use character_controller::CharacterController;
