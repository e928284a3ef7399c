//! First-person character controller
//!
//! Turns held movement keys and mouse motion into a collision-corrected
//! player position each tick. The controller owns the player's feet
//! position; the camera eye follows at a fixed height above it.
//!
//! There is no gravity or velocity: a tick moves the player by exactly the
//! requested offset, then hands the attempted position to the
//! [`CollisionSystem`]. With terrain following enabled the feet are snapped
//! onto the ground below when it is within reach.

use crate::core::config::ControllerConfig;
use crate::foundation::math::{Vec2, Vec3, WORLD_UP};
use crate::input::{InputState, MovementKeys};
use crate::physics::collision_system::{CollisionSystem, Resolution};
use crate::render::{Camera, MoveDirection};

/// Keyboard-and-mouse walker over a static level
#[derive(Debug, Clone)]
pub struct CharacterController {
    position: Vec3,
    config: ControllerConfig,
    grounded: bool,
}

impl CharacterController {
    /// Create a controller with its feet at `position`
    pub fn new(position: Vec3, config: ControllerConfig) -> Self {
        Self {
            position,
            config,
            grounded: false,
        }
    }

    /// Feet position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Camera eye position
    pub fn eye_position(&self) -> Vec3 {
        self.position + WORLD_UP * self.config.eye_height
    }

    /// Whether the last tick ended snapped onto the ground
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Controller settings
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Move the feet without collision checks
    pub fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.grounded = false;
        log::debug!("Player teleported to {:?}", position);
    }

    /// Offset requested by `keys` for a tick of `dt` seconds
    ///
    /// Each held direction contributes `move_speed * dt` along the camera's
    /// front, right or world-up axis; opposite keys cancel.
    pub fn desired_move(&self, keys: MovementKeys, camera: &Camera, dt: f32) -> Vec3 {
        let step = self.config.move_speed * dt;
        let bindings = [
            (MovementKeys::FORWARD, MoveDirection::Forward),
            (MovementKeys::BACKWARD, MoveDirection::Backward),
            (MovementKeys::LEFT, MoveDirection::Left),
            (MovementKeys::RIGHT, MoveDirection::Right),
            (MovementKeys::UP, MoveDirection::Up),
            (MovementKeys::DOWN, MoveDirection::Down),
        ];

        bindings
            .iter()
            .filter(|(key, _)| keys.contains(*key))
            .map(|(_, direction)| camera.move_delta(*direction, step))
            .sum()
    }

    /// Advance one tick
    ///
    /// Consumes the accumulated mouse motion to turn the camera, moves the
    /// player, resolves collisions, applies terrain following and finally
    /// places the camera eye above the committed feet position.
    pub fn update(
        &mut self,
        input: &mut InputState,
        camera: &mut Camera,
        collision: &CollisionSystem,
        dt: f32,
    ) -> Resolution {
        let mouse = input.take_mouse_delta();
        if mouse != Vec2::zeros() {
            camera.update_rotation(mouse.x, mouse.y);
        }

        let attempted = self.position + self.desired_move(input.movement(), camera, dt);
        let mut resolution = collision.resolve(self.position, attempted);

        if self.config.terrain_following {
            self.grounded = false;
            if let Some(ground) = collision.ground_height_within(resolution.position, self.config.snap_distance) {
                let gap = resolution.position.y - ground;
                if gap.abs() <= self.config.snap_distance {
                    resolution.position.y = ground;
                    self.grounded = true;
                }
            }
        }

        self.position = resolution.position;
        camera.set_position(self.eye_position());
        resolution
    }
}
