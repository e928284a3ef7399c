//! # Unified Configuration System
//!
//! All configuration structures of the sandbox in one place: engine-level
//! settings (logging), the collision system, the player controller and the
//! camera.
//!
//! ## Design Goals
//!
//! - **Centralized**: All configuration types in one place for easy discovery
//! - **Serializable**: Loaded from TOML or RON through the [`Config`] trait
//! - **Forgiving**: Every section has defaults, so partial files are valid

use serde::{Serialize, Deserialize};

use crate::physics::collision_system::{DEFAULT_PLAYER_HEIGHT, DEFAULT_PLAYER_RADIUS};

pub use crate::config::{Config, ConfigError, ConfigFormat};

/// # Engine Configuration
///
/// Core engine behavior that is not tied to a subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter, used when `RUST_LOG` is not set
    pub log_level: String,
    /// Fixed simulation step in seconds
    pub tick_seconds: f32,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            tick_seconds: 1.0 / 60.0,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Collision Configuration
///
/// Player volume and resolution strategy for the collision system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Radius of the player collision sphere
    pub player_radius: f32,
    /// Player height; the collision sphere sits at half this height
    pub player_height: f32,
    /// Full correction passes per resolve (1 = single greedy pass)
    pub max_passes: u32,
    /// Split moves into sub-moves of at most this length (None = positional only)
    pub substep_length: Option<f32>,
    /// Reject index buffers whose length is not a multiple of 3
    pub strict_index_count: bool,
}

impl CollisionConfig {
    /// Set the number of correction passes
    pub fn with_max_passes(mut self, passes: u32) -> Self {
        self.max_passes = passes;
        self
    }

    /// Enable sub-stepping with the given maximum sub-move length
    pub fn with_substep_length(mut self, length: f32) -> Self {
        self.substep_length = Some(length);
        self
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            player_radius: DEFAULT_PLAYER_RADIUS,
            player_height: DEFAULT_PLAYER_HEIGHT,
            max_passes: 1,
            substep_length: None,
            strict_index_count: false,
        }
    }
}

/// # Controller Configuration
///
/// How input turns into player movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Movement speed in units per second
    pub move_speed: f32,
    /// Camera eye height above the feet
    pub eye_height: f32,
    /// Snap the feet onto the ground below after each move
    pub terrain_following: bool,
    /// Maximum vertical gap that terrain following closes
    pub snap_distance: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            eye_height: 1.6,
            terrain_following: false,
            snap_distance: 0.5,
        }
    }
}

/// # Camera Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane distance
    pub near: f32,
    /// Far clipping plane distance
    pub far: f32,
    /// Radians of rotation per unit of mouse movement
    pub mouse_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            near: 0.1,
            far: 100.0,
            mouse_sensitivity: 0.001,
        }
    }
}

/// # Complete Sandbox Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Collision system configuration
    pub collision: CollisionConfig,
    /// Player controller configuration
    pub controller: ControllerConfig,
    /// Camera configuration
    pub camera: CameraConfig,
}

impl SandboxConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if !(self.engine.tick_seconds > 0.0) {
            return invalid("engine.tick_seconds must be positive");
        }
        if !(self.collision.player_radius > 0.0) {
            return invalid("collision.player_radius must be positive");
        }
        if !(self.collision.player_height >= 0.0) {
            return invalid("collision.player_height must not be negative");
        }
        if self.collision.max_passes == 0 {
            return invalid("collision.max_passes must be at least 1");
        }
        if matches!(self.collision.substep_length, Some(length) if !(length > 0.0)) {
            return invalid("collision.substep_length must be positive when set");
        }
        if self.controller.move_speed < 0.0 {
            return invalid("controller.move_speed must not be negative");
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return invalid("camera clipping planes must satisfy 0 < near < far");
        }
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return invalid("camera.fov_degrees must be within (0, 180)");
        }
        Ok(())
    }
}

impl Config for SandboxConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SandboxConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.collision.player_radius, 0.3);
        assert_eq!(config.collision.player_height, 1.8);
        assert_eq!(config.collision.max_passes, 1);
        assert_eq!(config.collision.substep_length, None);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = r#"
[collision]
player_radius = 0.4
max_passes = 4

[controller]
terrain_following = true
"#;
        let config = SandboxConfig::from_str_as(text, ConfigFormat::Toml).unwrap();
        assert_eq!(config.collision.player_radius, 0.4);
        assert_eq!(config.collision.player_height, 1.8);
        assert_eq!(config.collision.max_passes, 4);
        assert!(config.controller.terrain_following);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_toml_round_trip_keeps_substep() {
        let mut config = SandboxConfig::default();
        config.collision = config.collision.with_substep_length(0.1).with_max_passes(3);
        config.engine = config.engine.with_log_level("debug");

        let text = config.to_string_as(ConfigFormat::Toml).unwrap();
        let parsed = SandboxConfig::from_str_as(&text, ConfigFormat::Toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_ron_parse() {
        let text = "(collision: (player_height: 2.0, substep_length: Some(0.2)), camera: (fov_degrees: 75.0))";
        let config = SandboxConfig::from_str_as(text, ConfigFormat::Ron).unwrap();
        assert_eq!(config.collision.player_height, 2.0);
        assert_eq!(config.collision.substep_length, Some(0.2));
        assert_eq!(config.camera.fov_degrees, 75.0);
    }

    #[test]
    fn test_validation_rejects_nonsense() {
        let mut config = SandboxConfig::default();
        config.collision.max_passes = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SandboxConfig::default();
        config.camera.near = 10.0;
        config.camera.far = 1.0;
        assert!(config.validate().is_err());

        let mut config = SandboxConfig::default();
        config.collision.substep_length = Some(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert_eq!(ConfigFormat::from_path("sandbox.toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path("sandbox.ron"), Some(ConfigFormat::Ron));
        assert!(matches!(
            SandboxConfig::load_from_file("sandbox.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            SandboxConfig::default().save_to_file("sandbox.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir();
        let mut config = SandboxConfig::default();
        config.collision.max_passes = 3;
        config.controller.terrain_following = true;

        for name in ["sandbox_engine_config_test.toml", "sandbox_engine_config_test.ron"] {
            let path = dir.join(name);
            let path = path.to_string_lossy();
            config.save_to_file(&path).unwrap();

            let loaded = SandboxConfig::load_from_file(&path).unwrap();
            let _ = std::fs::remove_file(&*path);

            assert_eq!(loaded.collision.max_passes, 3);
            assert!(loaded.controller.terrain_following);
        }

        assert!(matches!(
            SandboxConfig::load_from_file(&dir.join("sandbox_engine_missing.toml").to_string_lossy()),
            Err(ConfigError::Io(_))
        ));
    }
}
