//! Unit quaternions for 3D rotation.
//!
//! Multiplication (`*`) is the raw Hamilton product and may drift from unit
//! length. Every rotation-composing helper in this module ([`Quaternion::compose`],
//! [`Quaternion::from_euler`], [`Quaternion::slerp`]) renormalizes its result,
//! and callers that chain raw products should call [`Quaternion::normalized`]
//! before trusting the value as a rotation.

use std::ops::{Add, Div, Mul, Neg};

use glam::Quat;

use crate::angle::EPSILON;
use crate::transform::Transform;
use crate::vector::Vector3;

/// Above this cosine, slerp falls back to normalized linear interpolation.
const SLERP_LINEAR_THRESHOLD: f64 = 0.9995;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `radians` about `axis`. A zero axis yields the identity.
    pub fn from_axis_angle(axis: Vector3, radians: f64) -> Self {
        let axis = axis.normalized();
        if axis == Vector3::ZERO {
            return Self::IDENTITY;
        }
        let (s, c) = (radians * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Builds a rotation from Euler angles in radians.
    ///
    /// `euler.x` is pitch (about X), `euler.y` is yaw (about Y) and `euler.z`
    /// is roll (about Z). The rotations compose as `roll * yaw * pitch`, so
    /// pitch is applied to a vector first.
    pub fn from_euler(euler: Vector3) -> Self {
        let pitch = Self::from_axis_angle(Vector3::X, euler.x);
        let yaw = Self::from_axis_angle(Vector3::Y, euler.y);
        let roll = Self::from_axis_angle(Vector3::Z, euler.z);
        (roll * yaw * pitch).normalized()
    }

    /// Extracts `(pitch, yaw, roll)` as the inverse of [`Quaternion::from_euler`].
    ///
    /// Yaw is clamped to ±90° when the rotation sits at gimbal lock.
    pub fn to_euler(self) -> Vector3 {
        let q = self.normalized();

        let sinr_cosp = 2.0 * (q.w * q.x + q.y * q.z);
        let cosr_cosp = 1.0 - 2.0 * (q.x * q.x + q.y * q.y);
        let pitch = sinr_cosp.atan2(cosr_cosp);

        let sinp = 2.0 * (q.w * q.y - q.z * q.x);
        let yaw = if sinp.abs() >= 1.0 {
            std::f64::consts::FRAC_PI_2.copysign(sinp)
        } else {
            sinp.asin()
        };

        let siny_cosp = 2.0 * (q.w * q.z + q.x * q.y);
        let cosy_cosp = 1.0 - 2.0 * (q.y * q.y + q.z * q.z);
        let roll = siny_cosp.atan2(cosy_cosp);

        Vector3::new(pitch, yaw, roll)
    }

    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn is_normalized(self) -> bool {
        (self.length_squared() - 1.0).abs() < EPSILON
    }

    /// Returns a unit-length copy. A zero quaternion becomes the identity.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 { self / len } else { Self::IDENTITY }
    }

    pub fn normalize(&mut self) -> &mut Self {
        *self = self.normalized();
        self
    }

    /// Inverse of a unit quaternion (its conjugate).
    pub fn inverse(self) -> Self {
        debug_assert!(self.is_normalized(), "inverse of a non-unit quaternion");
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// `self * rhs`, renormalized.
    pub fn compose(self, rhs: Self) -> Self {
        (self * rhs).normalized()
    }

    /// Rotates a vector by this quaternion.
    pub fn rotate_vector(self, v: Vector3) -> Vector3 {
        let u = Vector3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }

    /// Spherical linear interpolation towards `to` by `weight` in `[0, 1]`.
    ///
    /// Takes the shortest arc by flipping `to` when the inputs lie in opposite
    /// hemispheres, and falls back to normalized linear interpolation when
    /// they are nearly parallel. A weight of exactly 1 returns `to` itself,
    /// unflipped.
    pub fn slerp(self, to: Self, weight: f64) -> Self {
        if weight == 1.0 {
            return to.normalized();
        }
        let mut to = to;
        let mut cos_theta = self.dot(to);
        if cos_theta < 0.0 {
            to = -to;
            cos_theta = -cos_theta;
        }

        if cos_theta > SLERP_LINEAR_THRESHOLD {
            return (self * (1.0 - weight) + to * weight).normalized();
        }

        let theta = cos_theta.acos();
        let sin_theta = theta.sin();
        let from_scale = ((1.0 - weight) * theta).sin() / sin_theta;
        let to_scale = (weight * theta).sin() / sin_theta;
        (self * from_scale + to * to_scale).normalized()
    }

    /// Pure rotation matrix for this quaternion.
    pub fn to_transform(self) -> Transform {
        Transform::from_quaternion(self.normalized())
    }

    /// Narrows to single precision for the render layer.
    pub fn to_quat(self) -> Quat {
        Quat::from_xyzw(self.x as f32, self.y as f32, self.z as f32, self.w as f32)
    }

    pub fn abs_diff_eq(self, rhs: Self, epsilon: f64) -> bool {
        (self.x - rhs.x).abs() <= epsilon
            && (self.y - rhs.y).abs() <= epsilon
            && (self.z - rhs.z).abs() <= epsilon
            && (self.w - rhs.w).abs() <= epsilon
    }
}

impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

impl Mul<f64> for Quaternion {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl Div<f64> for Quaternion {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs, self.w / rhs)
    }
}

impl Add for Quaternion {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_identity_default() {
        let q = Quaternion::default();
        assert_eq!(q, Quaternion::new(0.0, 0.0, 0.0, 1.0));
        assert!(q.is_normalized());
    }

    #[test]
    fn test_hamilton_product() {
        let p = Quaternion::new(1.0, -2.0, 1.0, 3.0);
        let q = Quaternion::new(-1.0, 2.0, 3.0, 2.0);

        assert_eq!(p * q, Quaternion::new(-9.0, -2.0, 11.0, 8.0));
    }

    #[test]
    fn test_length_and_normalize() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert!((q.length_squared() - 30.0).abs() < EPSILON);

        let n = q.normalized();
        assert!((n.length() - 1.0).abs() < 1e-12);

        let mut m = Quaternion::new(0.5, -0.5, 0.5, -0.5);
        m.normalize();
        assert!((m.length() - 1.0).abs() < 1e-12);

        assert_eq!(Quaternion::new(0.0, 0.0, 0.0, 0.0).normalized(), Quaternion::IDENTITY);
    }

    #[test]
    fn test_inverse_law() {
        let samples = [
            Quaternion::from_axis_angle(Vector3::X, FRAC_PI_2),
            Quaternion::from_euler(Vector3::new(0.3, -0.7, 1.0)),
            Quaternion::new(1.0, 2.0, 3.0, 4.0).normalized(),
        ];

        for q in samples {
            let id = q * q.inverse();
            assert!(
                id.abs_diff_eq(Quaternion::IDENTITY, EPSILON),
                "q * q^-1 should be identity, got {:?}",
                id
            );
        }
    }

    #[test]
    fn test_from_euler_single_axis() {
        let pitch = Quaternion::from_euler(Vector3::new(0.5, 0.0, 0.0));
        assert!(pitch.abs_diff_eq(Quaternion::new(0.25_f64.sin(), 0.0, 0.0, 0.25_f64.cos()), 1e-6));

        let yaw = Quaternion::from_euler(Vector3::new(0.0, -0.7, 0.0));
        assert!(yaw.abs_diff_eq(Quaternion::new(0.0, (-0.35_f64).sin(), 0.0, (-0.35_f64).cos()), 1e-6));

        let roll = Quaternion::from_euler(Vector3::new(0.0, 0.0, 1.2));
        assert!(roll.abs_diff_eq(Quaternion::new(0.0, 0.0, 0.6_f64.sin(), 0.6_f64.cos()), 1e-6));
    }

    #[test]
    fn test_from_euler_composition_order() {
        let euler = Vector3::new(0.3, -0.7, 1.0);
        let expected = Quaternion::from_axis_angle(Vector3::Z, euler.z)
            * Quaternion::from_axis_angle(Vector3::Y, euler.y)
            * Quaternion::from_axis_angle(Vector3::X, euler.x);

        assert!(Quaternion::from_euler(euler).abs_diff_eq(expected.normalized(), EPSILON));
    }

    #[test]
    fn test_to_euler_inverts_from_euler() {
        assert!(Quaternion::IDENTITY.to_euler().abs_diff_eq(Vector3::ZERO, 1e-6));

        let euler = Vector3::new(0.3, -0.7, 1.0);
        let back = Quaternion::from_euler(euler).to_euler();
        assert!(back.abs_diff_eq(euler, 1e-9), "got {:?}", back);
    }

    #[test]
    fn test_to_euler_gimbal_lock_clamps() {
        let q = Quaternion::from_euler(Vector3::new(0.0, FRAC_PI_2, 0.0));
        let euler = q.to_euler();
        assert!((euler.y - FRAC_PI_2).abs() < 1e-6);
        assert!(!euler.x.is_nan() && !euler.z.is_nan());
    }

    #[test]
    fn test_slerp_endpoints() {
        let q0 = Quaternion::IDENTITY;
        let q1 = Quaternion::from_axis_angle(Vector3::Z, PI * 0.75);

        assert!(q0.slerp(q1, 0.0).abs_diff_eq(q0, 1e-12));
        assert!(q0.slerp(q1, 1.0).abs_diff_eq(q1, 1e-12));
        assert!((q0.slerp(q1, 0.5).length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_slerp_endpoints_across_hemispheres() {
        let q0 = Quaternion::IDENTITY;
        let q1 = -Quaternion::from_axis_angle(Vector3::Y, 3.0);
        assert!(q0.dot(q1) < 0.0);

        assert!(q0.slerp(q1, 0.0).abs_diff_eq(q0, 1e-12));
        assert!(q0.slerp(q1, 1.0).abs_diff_eq(q1, 1e-12));
    }

    #[test]
    fn test_slerp_midpoint_angle() {
        let q0 = Quaternion::IDENTITY;
        let q1 = Quaternion::from_axis_angle(Vector3::Y, FRAC_PI_2);
        let mid = q0.slerp(q1, 0.5);

        let expected = Quaternion::from_axis_angle(Vector3::Y, FRAC_PI_2 * 0.5);
        assert!(mid.abs_diff_eq(expected, EPSILON));
    }

    #[test]
    fn test_slerp_takes_shortest_path() {
        let q0 = Quaternion::IDENTITY;
        let q1 = -Quaternion::from_axis_angle(Vector3::X, 0.5);
        let mid = q0.slerp(q1, 0.5);

        // Same rotation as interpolating towards the un-negated target.
        let expected = Quaternion::from_axis_angle(Vector3::X, 0.25);
        assert!(mid.abs_diff_eq(expected, EPSILON));
    }

    #[test]
    fn test_slerp_nearly_parallel_falls_back_to_lerp() {
        let q0 = Quaternion::from_axis_angle(Vector3::Y, 0.1);
        let q1 = Quaternion::from_axis_angle(Vector3::Y, 0.1 + 1e-6);
        let mid = q0.slerp(q1, 0.5);

        assert!((mid.length() - 1.0).abs() < 1e-12);
        assert!(mid.abs_diff_eq(Quaternion::from_axis_angle(Vector3::Y, 0.1 + 5e-7), 1e-9));
    }

    #[test]
    fn test_rotate_vector() {
        let q = Quaternion::from_axis_angle(Vector3::Y, FRAC_PI_2);
        let v = q.rotate_vector(Vector3::X);
        assert!(v.abs_diff_eq(Vector3::new(0.0, 0.0, -1.0), EPSILON));
    }

    #[test]
    fn test_compose_renormalizes() {
        let a = Quaternion::new(0.0, 0.0, 0.0, 2.0);
        let b = Quaternion::from_axis_angle(Vector3::Z, 0.3);
        assert!((a.compose(b).length() - 1.0).abs() < 1e-12);
    }
}
