//! # Core Engine Module
//!
//! Shared abstractions that the other subsystems depend on.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for logging, collision, controller and camera

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    CameraConfig,
    CollisionConfig,
    Config,
    ConfigError,
    ConfigFormat,
    ControllerConfig,
    EngineConfig,
    SandboxConfig,
};
