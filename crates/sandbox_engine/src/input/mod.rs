//! Input state tracking
//!
//! Window events are translated into an [`InputState`]: a set of held
//! movement keys plus the mouse motion accumulated since the last frame.
//! The state is polled once per tick by the character controller.

use bitflags::bitflags;

use crate::foundation::math::Vec2;

bitflags! {
    /// Held movement keys
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MovementKeys: u8 {
        /// Move along the view direction
        const FORWARD = 1 << 0;
        /// Move against the view direction
        const BACKWARD = 1 << 1;
        /// Strafe left
        const LEFT = 1 << 2;
        /// Strafe right
        const RIGHT = 1 << 3;
        /// Move along world up
        const UP = 1 << 4;
        /// Move against world up
        const DOWN = 1 << 5;
    }
}

/// Key codes the sandbox reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// Space key
    Space,
    /// Left shift key
    LeftShift,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Escape key
    Escape,
}

impl KeyCode {
    /// Movement bound to this key, if any
    pub fn movement(self) -> MovementKeys {
        match self {
            KeyCode::W | KeyCode::Up => MovementKeys::FORWARD,
            KeyCode::S | KeyCode::Down => MovementKeys::BACKWARD,
            KeyCode::A | KeyCode::Left => MovementKeys::LEFT,
            KeyCode::D | KeyCode::Right => MovementKeys::RIGHT,
            KeyCode::Space => MovementKeys::UP,
            KeyCode::LeftShift => MovementKeys::DOWN,
            KeyCode::Escape => MovementKeys::empty(),
        }
    }
}

/// Per-frame input snapshot source
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: MovementKeys,
    mouse_delta: Vec2,
    pointer_locked: bool,
}

impl InputState {
    /// Create an input state with nothing held and the pointer free
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press or release
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        self.keys.set(key.movement(), pressed);
        if key == KeyCode::Escape && pressed {
            self.set_pointer_locked(false);
        }
    }

    /// Record relative mouse motion; ignored unless the pointer is locked
    pub fn handle_mouse_move(&mut self, dx: f32, dy: f32) {
        if self.pointer_locked {
            self.mouse_delta += Vec2::new(dx, dy);
        }
    }

    /// Lock or release the pointer
    pub fn set_pointer_locked(&mut self, locked: bool) {
        if self.pointer_locked != locked {
            log::debug!("Pointer {}", if locked { "locked" } else { "released" });
        }
        self.pointer_locked = locked;
    }

    /// Whether mouse motion is being captured
    pub fn is_pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Whether all of `keys` are held
    pub fn is_pressed(&self, keys: MovementKeys) -> bool {
        self.keys.contains(keys)
    }

    /// All held movement keys
    pub fn movement(&self) -> MovementKeys {
        self.keys
    }

    /// Return the accumulated mouse motion and reset it
    pub fn take_mouse_delta(&mut self) -> Vec2 {
        std::mem::replace(&mut self.mouse_delta, Vec2::zeros())
    }
}
