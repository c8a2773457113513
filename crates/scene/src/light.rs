//! Light payload for scene nodes.

use orrery_math::Vector3;

/// An area light. Its position comes from the owning node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    /// Linear RGB color.
    pub color: Vector3,
    /// Ambient contribution of the light.
    pub strength: f64,
}

impl Light {
    pub fn new(color: Vector3, strength: f64) -> Self {
        Self { color, strength }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            color: Vector3::ONE,
            strength: 0.1,
        }
    }
}
