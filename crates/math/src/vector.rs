//! Double-precision vector types.
//!
//! [`Vector2`], [`Vector3`] and [`Vector4`] are plain value types with
//! component-wise and scalar arithmetic. Normalizing a zero-length vector
//! yields the zero vector rather than NaN components.

use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub, SubAssign};

use glam::{Vec2, Vec3, Vec4};

use crate::angle;

macro_rules! impl_vector_ops {
    ($name:ident { $($field:ident),+ }) => {
        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl Mul for $name {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                Self { $($field: self.$field * rhs.$field),+ }
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                rhs * self
            }
        }

        impl MulAssign<f64> for $name {
            fn mul_assign(&mut self, rhs: f64) {
                $(self.$field *= rhs;)+
            }
        }

        impl Div for $name {
            type Output = Self;
            fn div(self, rhs: Self) -> Self {
                Self { $($field: self.$field / rhs.$field),+ }
            }
        }

        impl Div<f64> for $name {
            type Output = Self;
            fn div(self, rhs: f64) -> Self {
                Self { $($field: self.$field / rhs),+ }
            }
        }

        impl DivAssign<f64> for $name {
            fn div_assign(&mut self, rhs: f64) {
                $(self.$field /= rhs;)+
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl $name {
            /// Creates a vector with all components set to `value`.
            pub const fn splat(value: f64) -> Self {
                Self { $($field: value),+ }
            }

            /// Dot product.
            pub fn dot(self, rhs: Self) -> f64 {
                0.0 $(+ self.$field * rhs.$field)+
            }

            /// Squared Euclidean length.
            pub fn magnitude_squared(self) -> f64 {
                self.dot(self)
            }

            /// Euclidean length.
            pub fn magnitude(self) -> f64 {
                self.magnitude_squared().sqrt()
            }

            /// Returns a unit-length copy, or the zero vector if the length is zero.
            pub fn normalized(self) -> Self {
                let len = self.magnitude();
                if len > 0.0 { self / len } else { Self::splat(0.0) }
            }

            /// Normalizes in place. A zero vector stays zero.
            pub fn normalize(&mut self) -> &mut Self {
                *self = self.normalized();
                self
            }

            /// Converts every component from degrees to radians.
            pub fn to_radians(self) -> Self {
                Self { $($field: angle::to_radians(self.$field)),+ }
            }

            /// Converts every component from radians to degrees.
            pub fn to_degrees(self) -> Self {
                Self { $($field: angle::to_degrees(self.$field)),+ }
            }

            /// Component-wise comparison within `epsilon`.
            pub fn abs_diff_eq(self, rhs: Self, epsilon: f64) -> bool {
                true $(&& (self.$field - rhs.$field).abs() <= epsilon)+
            }
        }
    };
}

/// A 2D vector, used for cursor deltas and screen-space values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self::splat(0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The z component of the 3D cross product of the two vectors.
    pub fn cross_z(self, rhs: Self) -> f64 {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Narrows to single precision for the render layer.
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl_vector_ops!(Vector2 { x, y });

/// A 3D vector with double-precision components.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self::splat(0.0);
    pub const ONE: Self = Self::splat(1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Right-handed cross product.
    pub fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Extends to a homogeneous vector with the given `w`.
    pub fn extend(self, w: f64) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, w)
    }

    /// Narrows to single precision for the render layer.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl_vector_ops!(Vector3 { x, y, z });

impl Index<usize> for Vector3 {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3 index out of range: {index}"),
        }
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// A 4D vector, used for homogeneous coordinates and colors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vector4 {
    pub const ZERO: Self = Self::splat(0.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Drops the `w` component.
    pub fn truncate(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Narrows to single precision for the render layer.
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.x as f32, self.y as f32, self.z as f32, self.w as f32)
    }
}

impl_vector_ops!(Vector4 { x, y, z, w });

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_arithmetic() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vector3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vector3::splat(3.0));
        assert_eq!(a * b, Vector3::new(4.0, 10.0, 18.0));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(b / 2.0, Vector3::new(2.0, 2.5, 3.0));
        assert_eq!(-a, Vector3::new(-1.0, -2.0, -3.0));

        let mut c = a;
        c += b;
        c -= a;
        c *= 0.5;
        assert_eq!(c, b * 0.5);
    }

    #[test]
    fn test_dot_and_cross() {
        assert_eq!(Vector3::X.dot(Vector3::Y), 0.0);
        assert_eq!(Vector3::X.cross(Vector3::Y), Vector3::Z);
        assert_eq!(Vector3::Y.cross(Vector3::Z), Vector3::X);
        assert_eq!(Vector3::Z.cross(Vector3::X), Vector3::Y);
        assert_eq!(Vector3::new(1.0, 2.0, 3.0).dot(Vector3::new(4.0, -5.0, 6.0)), 12.0);
    }

    #[test]
    fn test_normalize() {
        let v = Vector3::new(3.0, 0.0, 4.0);
        assert!((v.magnitude() - 5.0).abs() < EPSILON);

        let n = v.normalized();
        assert!((n.magnitude() - 1.0).abs() < EPSILON);
        assert!(n.abs_diff_eq(Vector3::new(0.6, 0.0, 0.8), EPSILON));

        let mut m = v;
        m.normalize();
        assert_eq!(m, n);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vector3::ZERO.normalized(), Vector3::ZERO);
        assert_eq!(Vector2::ZERO.normalized(), Vector2::ZERO);

        let mut zero = Vector4::ZERO;
        zero.normalize();
        assert_eq!(zero, Vector4::ZERO);
    }

    #[test]
    fn test_angle_conversion() {
        let deg = Vector3::new(180.0, 90.0, -45.0);
        let rad = deg.to_radians();
        assert!((rad.x - std::f64::consts::PI).abs() < EPSILON);
        assert!((rad.y - std::f64::consts::FRAC_PI_2).abs() < EPSILON);
        assert!(rad.to_degrees().abs_diff_eq(deg, 1e-9));
    }

    #[test]
    fn test_narrowing() {
        let v = Vector3::new(1.5, -2.25, 3.0).to_vec3();
        assert_eq!(v, Vec3::new(1.5, -2.25, 3.0));
        assert_eq!(Vector2::new(1.0, 2.0).cross_z(Vector2::new(3.0, 4.0)), -2.0);
    }
}
