//! Scalar helpers for angles and approximate comparison.

use std::f64::consts::{PI, TAU};

/// Tolerance used by [`almost_equal`] and unit-length checks.
pub const EPSILON: f64 = 1e-6;

const DEG_TO_RAD: f64 = PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / PI;

pub fn to_radians(degrees: f64) -> f64 {
    degrees * DEG_TO_RAD
}

pub fn to_degrees(radians: f64) -> f64 {
    radians * RAD_TO_DEG
}

/// Wraps an angle into the half-open range `(-PI, PI]`.
pub fn wrap_radians(radians: f64) -> f64 {
    let wrapped = (radians + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI { PI } else { wrapped }
}

/// Clamps `value` into `[lo, hi]`, accepting the bounds in either order.
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    value.max(lo).min(hi)
}

/// Returns true when `a` and `b` differ by less than [`EPSILON`].
pub fn almost_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_radians() {
        assert!(almost_equal(wrap_radians(0.5), 0.5));
        assert!(almost_equal(wrap_radians(TAU + 0.5), 0.5));
        assert!(almost_equal(wrap_radians(-TAU - 0.5), -0.5));
        assert!(almost_equal(wrap_radians(PI), PI));
        assert!(almost_equal(wrap_radians(-PI), PI));
        assert!(almost_equal(wrap_radians(3.0 * PI / 2.0), -PI / 2.0));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(2.0, -1.0, 1.0), 1.0);
        assert_eq!(clamp(-2.0, 1.0, -1.0), -1.0);
        assert_eq!(clamp(0.25, -1.0, 1.0), 0.25);
    }

    #[test]
    fn test_degree_round_trip() {
        assert!(almost_equal(to_degrees(to_radians(37.5)), 37.5));
        assert!(almost_equal(to_radians(90.0), PI / 2.0));
    }
}
