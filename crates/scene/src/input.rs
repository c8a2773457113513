//! Per-frame input as seen by controllers.

use orrery_math::{Vector2, Vector3};

/// Something that can report the current movement intent and cursor motion.
///
/// Implemented by the platform layer; polled once per frame before the scene
/// updates.
pub trait InputSource {
    /// Discrete movement axes: x = strafe, y = forward, z = lift.
    fn movement_vector(&self) -> Vector3;

    /// Cursor motion since the previous frame.
    fn cursor_delta(&self) -> Vector2;
}

/// Input captured for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub movement: Vector3,
    pub cursor_delta: Vector2,
}

impl FrameInput {
    pub fn new(movement: Vector3, cursor_delta: Vector2) -> Self {
        Self {
            movement,
            cursor_delta,
        }
    }

    /// Snapshot the current state of `source`.
    pub fn capture(source: &(impl InputSource + ?Sized)) -> Self {
        Self {
            movement: source.movement_vector(),
            cursor_delta: source.cursor_delta(),
        }
    }
}

impl InputSource for FrameInput {
    fn movement_vector(&self) -> Vector3 {
        self.movement
    }

    fn cursor_delta(&self) -> Vector2 {
        self.cursor_delta
    }
}
