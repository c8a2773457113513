//! Camera payload for scene nodes.

use orrery_math::{Transform, angle};

/// Perspective projection carried by a camera node.
///
/// The camera has no position of its own: its view matrix is derived from the
/// global transform of the node it is attached to.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    fov_y: f64,
    aspect: f64,
    near: f64,
    far: f64,
    projection: Transform,
}

impl Camera {
    /// Create a perspective camera. `fov_deg` is the vertical field of view.
    pub fn perspective(fov_deg: f64, aspect: f64, near: f64, far: f64) -> Self {
        let fov_y = angle::to_radians(fov_deg);
        Self {
            fov_y,
            aspect,
            near,
            far,
            projection: Transform::perspective(fov_y, aspect, near, far),
        }
    }

    /// Update the aspect ratio and rebuild the projection.
    pub fn set_aspect(&mut self, aspect: f64) {
        self.aspect = aspect;
        self.rebuild();
    }

    /// Update the vertical field of view and rebuild the projection.
    pub fn set_fov_deg(&mut self, fov_deg: f64) {
        self.fov_y = angle::to_radians(fov_deg);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.projection = Transform::perspective(self.fov_y, self.aspect, self.near, self.far);
    }

    pub fn fov_deg(&self) -> f64 {
        angle::to_degrees(self.fov_y)
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn near(&self) -> f64 {
        self.near
    }

    pub fn far(&self) -> f64 {
        self.far
    }

    pub fn projection(&self) -> &Transform {
        &self.projection
    }

    /// View matrix for a camera placed at `global`.
    ///
    /// Looks along the node's forward axis (-Z) with the node's up axis.
    pub fn view_from(global: &Transform) -> Transform {
        let eye = global.translation();
        let up = global.up().normalized();
        Transform::look_at(eye, eye + global.forward(), up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(65.0, 16.0 / 9.0, 0.1, 10_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_math::Vector3;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_set_aspect_rebuilds_projection() {
        let mut camera = Camera::perspective(90.0, 1.0, 0.1, 100.0);
        assert!((camera.projection().at(0, 0) - 1.0).abs() < EPSILON);

        camera.set_aspect(2.0);
        assert!((camera.projection().at(0, 0) - 0.5).abs() < EPSILON);
        assert!((camera.projection().at(1, 1) - 1.0).abs() < EPSILON);
        assert_eq!(camera.aspect(), 2.0);
    }

    #[test]
    fn test_view_of_identity_is_identity() {
        let view = Camera::view_from(&Transform::IDENTITY);
        assert!(view.abs_diff_eq(&Transform::IDENTITY, EPSILON));
    }

    #[test]
    fn test_view_moves_world_opposite_to_eye() {
        let global = Transform::from_translation(Vector3::new(0.0, 5.0, 15.0));
        let view = Camera::view_from(&global);
        let eye_in_view = view.transform_point(Vector3::new(0.0, 5.0, 15.0));
        assert!(eye_in_view.abs_diff_eq(Vector3::ZERO, EPSILON));
    }

    #[test]
    fn test_fov_round_trip() {
        let mut camera = Camera::default();
        camera.set_fov_deg(70.0);
        assert!((camera.fov_deg() - 70.0).abs() < 1e-9);
    }
}
