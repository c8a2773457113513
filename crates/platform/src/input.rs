//! Keyboard and mouse state.

use std::collections::HashSet;

use orrery_math::{Vector2, Vector3};
use orrery_scene::InputSource;
use tracing::debug;

pub use winit::keyboard::KeyCode;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Left,
        }
    }
}

/// Keys feeding each movement axis, as `(positive, negative)`.
const STRAFE_KEYS: (KeyCode, KeyCode) = (KeyCode::KeyD, KeyCode::KeyA);
const FORWARD_KEYS: (KeyCode, KeyCode) = (KeyCode::KeyW, KeyCode::KeyS);
const LIFT_KEYS: (KeyCode, KeyCode) = (KeyCode::ArrowUp, KeyCode::ArrowDown);

/// Tracks the current state of keyboard and mouse input.
///
/// Feed it window events through the `on_*` methods, call [`begin_frame`]
/// once per frame after the scene has polled it, and hand it to the scene as
/// an [`InputSource`].
///
/// The cursor is captured by a left click and released by Escape. Cursor
/// motion is only reported while captured.
///
/// [`begin_frame`]: InputState::begin_frame
#[derive(Debug, Default)]
pub struct InputState {
    pressed_keys: HashSet<KeyCode>,
    just_pressed_keys: HashSet<KeyCode>,
    just_released_keys: HashSet<KeyCode>,

    pressed_buttons: HashSet<MouseButton>,
    just_pressed_buttons: HashSet<MouseButton>,
    just_released_buttons: HashSet<MouseButton>,

    /// Last known cursor position; `None` until the first move after a
    /// capture change, so re-capturing never produces a jump.
    mouse_position: Option<Vector2>,
    /// Cursor motion accumulated this frame.
    mouse_delta: Vector2,
    scroll_delta: Vector2,

    cursor_captured: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state.
    pub fn begin_frame(&mut self) {
        self.just_pressed_keys.clear();
        self.just_released_keys.clear();
        self.just_pressed_buttons.clear();
        self.just_released_buttons.clear();
        self.mouse_delta = Vector2::ZERO;
        self.scroll_delta = Vector2::ZERO;
    }

    /// Handle a key press event.
    pub fn on_key_pressed(&mut self, key: KeyCode) {
        if self.pressed_keys.insert(key) {
            self.just_pressed_keys.insert(key);
        }
        if key == KeyCode::Escape {
            self.release_cursor();
        }
    }

    /// Handle a key release event.
    pub fn on_key_released(&mut self, key: KeyCode) {
        if self.pressed_keys.remove(&key) {
            self.just_released_keys.insert(key);
        }
    }

    /// Handle a mouse button press event.
    pub fn on_mouse_pressed(&mut self, button: MouseButton) {
        if self.pressed_buttons.insert(button) {
            self.just_pressed_buttons.insert(button);
        }
        if button == MouseButton::Left {
            self.capture_cursor();
        }
    }

    /// Handle a mouse button release event.
    pub fn on_mouse_released(&mut self, button: MouseButton) {
        if self.pressed_buttons.remove(&button) {
            self.just_released_buttons.insert(button);
        }
    }

    /// Handle cursor movement to window coordinates `(x, y)`.
    pub fn on_mouse_moved(&mut self, x: f64, y: f64) {
        let position = Vector2::new(x, y);
        if let Some(previous) = self.mouse_position {
            self.mouse_delta += position - previous;
        }
        self.mouse_position = Some(position);
    }

    /// Handle mouse scroll.
    pub fn on_scroll(&mut self, delta_x: f64, delta_y: f64) {
        self.scroll_delta += Vector2::new(delta_x, delta_y);
    }

    pub fn capture_cursor(&mut self) {
        if !self.cursor_captured {
            self.cursor_captured = true;
            self.mouse_position = None;
            debug!("Cursor captured");
        }
    }

    pub fn release_cursor(&mut self) {
        if self.cursor_captured {
            self.cursor_captured = false;
            self.mouse_position = None;
            debug!("Cursor released");
        }
    }

    pub fn is_cursor_captured(&self) -> bool {
        self.cursor_captured
    }

    /// Check if a key is currently pressed.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Check if a key was just pressed this frame.
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    /// Check if a key was just released this frame.
    pub fn is_key_just_released(&self, key: KeyCode) -> bool {
        self.just_released_keys.contains(&key)
    }

    /// Check if a mouse button is currently pressed.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Check if a mouse button was just pressed this frame.
    pub fn is_mouse_just_pressed(&self, button: MouseButton) -> bool {
        self.just_pressed_buttons.contains(&button)
    }

    /// Check if a mouse button was just released this frame.
    pub fn is_mouse_just_released(&self, button: MouseButton) -> bool {
        self.just_released_buttons.contains(&button)
    }

    pub fn mouse_position(&self) -> Option<Vector2> {
        self.mouse_position
    }

    /// Raw cursor motion this frame, captured or not.
    pub fn mouse_delta(&self) -> Vector2 {
        self.mouse_delta
    }

    pub fn scroll_delta(&self) -> Vector2 {
        self.scroll_delta
    }

    fn axis(&self, (positive, negative): (KeyCode, KeyCode)) -> f64 {
        let mut value = 0.0;
        if self.is_key_pressed(positive) {
            value += 1.0;
        }
        if self.is_key_pressed(negative) {
            value -= 1.0;
        }
        value
    }
}

impl InputSource for InputState {
    /// W/S drive y, D/A drive x, Up/Down arrows drive z.
    fn movement_vector(&self) -> Vector3 {
        Vector3::new(
            self.axis(STRAFE_KEYS),
            self.axis(FORWARD_KEYS),
            self.axis(LIFT_KEYS),
        )
    }

    fn cursor_delta(&self) -> Vector2 {
        if self.cursor_captured {
            self.mouse_delta
        } else {
            Vector2::ZERO
        }
    }
}
