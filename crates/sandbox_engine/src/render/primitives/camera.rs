//! # First-Person Camera
//!
//! Yaw/pitch camera used both for rendering and for turning player input
//! into movement directions.
//!
//! ## Orientation
//! Right-handed, Y-up. With yaw and pitch at zero the camera looks down -Z:
//!
//! - `front = (cos(pitch) * sin(yaw), sin(pitch), -cos(pitch) * cos(yaw))`
//! - `right = normalize(front x world_up)`
//! - `up    = normalize(right x front)`
//!
//! Pitch is clamped short of straight up/down so `right` never degenerates.

use crate::core::config::CameraConfig;
use crate::foundation::math::{constants, utils, Mat4, Mat4Ext, Vec3, WORLD_UP};

/// Pitch limit for mouse look, just short of vertical
pub const MAX_LOOK_PITCH: f32 = constants::HALF_PI - 0.01;

/// Pitch limit while orbiting
pub const MAX_ORBIT_PITCH: f32 = 1.55;

/// Default radians of rotation per unit of mouse movement
pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 0.001;

/// Direction of a single camera-relative move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    /// Along the view direction
    Forward,
    /// Against the view direction
    Backward,
    /// Against the right vector
    Left,
    /// Along the right vector
    Right,
    /// Along world up
    Up,
    /// Against world up
    Down,
}

/// Axis an orbit rotates around
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitAxis {
    /// Horizontal orbit (changes yaw)
    Yaw,
    /// Vertical orbit (changes pitch)
    Pitch,
}

/// First-person perspective camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position in world space
    pub position: Vec3,

    yaw: f32,
    pitch: f32,

    front: Vec3,
    right: Vec3,
    up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clipping plane distance
    pub near: f32,
    /// Far clipping plane distance
    pub far: f32,
    /// Radians of rotation per unit of mouse movement
    pub sensitivity: f32,
}

impl Camera {
    /// Create a camera at `position` looking down -Z
    ///
    /// `fov_degrees` is converted to radians internally.
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            front: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::new(1.0, 0.0, 0.0),
            up: WORLD_UP,
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
            sensitivity: DEFAULT_MOUSE_SENSITIVITY,
        };
        camera.update_vectors();
        camera
    }

    /// Create a camera from configuration
    pub fn from_config(position: Vec3, aspect: f32, config: &CameraConfig) -> Self {
        let mut camera = Self::perspective(position, config.fov_degrees, aspect, config.near, config.far);
        camera.sensitivity = config.mouse_sensitivity;
        camera
    }

    /// Yaw angle in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch angle in radians
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Unit view direction
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Unit right vector (horizontal)
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Unit camera up vector
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Update aspect ratio after a viewport change
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Apply a mouse movement
    ///
    /// Moving right turns right, moving down looks down. Pitch is clamped to
    /// [`MAX_LOOK_PITCH`].
    pub fn update_rotation(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw += delta_x * self.sensitivity;
        self.pitch = (self.pitch - delta_y * self.sensitivity).clamp(-MAX_LOOK_PITCH, MAX_LOOK_PITCH);
        self.update_vectors();
    }

    /// Offset that moving `speed` units in `direction` would apply
    pub fn move_delta(&self, direction: MoveDirection, speed: f32) -> Vec3 {
        match direction {
            MoveDirection::Forward => self.front * speed,
            MoveDirection::Backward => self.front * -speed,
            MoveDirection::Left => self.right * -speed,
            MoveDirection::Right => self.right * speed,
            MoveDirection::Up => WORLD_UP * speed,
            MoveDirection::Down => WORLD_UP * -speed,
        }
    }

    /// Move the camera without any collision check
    pub fn move_direction(&mut self, direction: MoveDirection, speed: f32) {
        self.position += self.move_delta(direction, speed);
    }

    /// Turn the camera to face `target`
    ///
    /// Yaw and pitch are recovered from the new view direction so later mouse
    /// input continues smoothly from here. Targets straight above or below
    /// keep the previous right vector.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(front) = (target - self.position).try_normalize(f32::EPSILON) else {
            return;
        };

        self.pitch = front.y.clamp(-1.0, 1.0).asin();
        self.yaw = front.x.atan2(-front.z);
        self.set_basis(front);
    }

    /// Rotate the camera around `target` by `angle` radians, keeping its distance
    ///
    /// The camera ends up facing `target`.
    pub fn orbit(&mut self, target: Vec3, angle: f32, axis: OrbitAxis) {
        let radius = (self.position - target).norm();

        match axis {
            OrbitAxis::Yaw => self.yaw += angle,
            OrbitAxis::Pitch => {
                self.pitch = (self.pitch + angle).clamp(-MAX_ORBIT_PITCH, MAX_ORBIT_PITCH);
            }
        }

        self.position = target + Self::direction_from_angles(self.yaw, self.pitch) * radius;
        if let Some(front) = (target - self.position).try_normalize(f32::EPSILON) {
            self.set_basis(front);
        }
    }

    /// World-to-view matrix
    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection matrix
    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined model-view-projection matrix for one object
    pub fn mvp(&self, model: &Mat4) -> Mat4 {
        self.get_projection_matrix() * self.get_view_matrix() * model
    }

    fn direction_from_angles(yaw: f32, pitch: f32) -> Vec3 {
        Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), -pitch.cos() * yaw.cos())
    }

    fn update_vectors(&mut self) {
        let front = Self::direction_from_angles(self.yaw, self.pitch).normalize();
        self.set_basis(front);
    }

    fn set_basis(&mut self, front: Vec3) {
        self.front = front;
        if let Some(right) = front.cross(&WORLD_UP).try_normalize(f32::EPSILON) {
            self.right = right;
        }
        self.up = self.right.cross(&self.front).normalize();
    }
}

impl Default for Camera {
    /// Camera two units up and five back from the origin, looking down -Z
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 2.0, 5.0), 90.0, 16.0 / 9.0, 0.1, 100.0)
    }
}
