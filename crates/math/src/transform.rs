//! 4x4 homogeneous transform matrices.
//!
//! [`Transform`] stores sixteen `f64` values in row-major order: element
//! `(row, col)` lives at flat index `row * 4 + col`, and the translation of an
//! affine transform occupies the last column. Points are column vectors, so a
//! product `a * b` applies `b` first.
//!
//! # Example
//!
//! ```
//! use orrery_math::{Transform, Vector3};
//!
//! let mut t = Transform::IDENTITY;
//! t.translate(Vector3::new(1.0, 2.0, 3.0));
//! t.scale(Vector3::splat(2.0));
//!
//! let p = t.transform_point(Vector3::ONE);
//! assert_eq!(p, Vector3::new(3.0, 4.0, 5.0));
//! ```

use std::ops::{Index, IndexMut, Mul, MulAssign};

use glam::Mat4;

use crate::quaternion::Quaternion;
use crate::vector::{Vector3, Vector4};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    data: [f64; 16],
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self::from_scalar(1.0);

    /// Scaled identity: `scalar` on the diagonal, zero elsewhere.
    pub const fn from_scalar(scalar: f64) -> Self {
        let mut data = [0.0; 16];
        data[0] = scalar;
        data[5] = scalar;
        data[10] = scalar;
        data[15] = scalar;
        Self { data }
    }

    /// Wraps sixteen values given in row-major order, as produced by scene-file
    /// importers.
    pub const fn from_row_major(data: [f64; 16]) -> Self {
        Self { data }
    }

    /// Pure rotation matrix for a quaternion.
    ///
    /// The quaternion does not need to be unit length; the conversion divides by
    /// its squared norm.
    pub fn from_quaternion(q: Quaternion) -> Self {
        let d = q.length_squared();
        if d == 0.0 {
            return Self::IDENTITY;
        }
        let s = 2.0 / d;

        let (xs, ys, zs) = (q.x * s, q.y * s, q.z * s);
        let (wx, wy, wz) = (q.w * xs, q.w * ys, q.w * zs);
        let (xx, xy, xz) = (q.x * xs, q.x * ys, q.x * zs);
        let (yy, yz, zz) = (q.y * ys, q.y * zs, q.z * zs);

        Self::from_row_major([
            1.0 - (yy + zz), xy - wz, xz + wy, 0.0,
            xy + wz, 1.0 - (xx + zz), yz - wx, 0.0,
            xz - wy, yz + wx, 1.0 - (xx + yy), 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn from_translation(v: Vector3) -> Self {
        let mut t = Self::IDENTITY;
        t.data[3] = v.x;
        t.data[7] = v.y;
        t.data[11] = v.z;
        t
    }

    pub fn from_scale(v: Vector3) -> Self {
        let mut t = Self::IDENTITY;
        t.data[0] = v.x;
        t.data[5] = v.y;
        t.data[10] = v.z;
        t
    }

    /// Rotation of `radians` about `axis` (Rodrigues form). A zero axis yields
    /// the identity.
    pub fn from_axis_angle(axis: Vector3, radians: f64) -> Self {
        let axis = axis.normalized();
        if axis == Vector3::ZERO {
            return Self::IDENTITY;
        }
        let Vector3 { x, y, z } = axis;
        let (s, c) = radians.sin_cos();
        let ic = 1.0 - c;

        Self::from_row_major([
            x * x * ic + c, x * y * ic - z * s, x * z * ic + y * s, 0.0,
            y * x * ic + z * s, y * y * ic + c, y * z * ic - x * s, 0.0,
            z * x * ic - y * s, z * y * ic + x * s, z * z * ic + c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Element at `(row, col)`.
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * 4 + col]
    }

    pub fn at_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        &mut self.data[row * 4 + col]
    }

    pub fn as_row_major(&self) -> &[f64; 16] {
        &self.data
    }

    /// Post-multiplies by a translation: `self = self * T(v)`.
    pub fn translate(&mut self, v: Vector3) -> &mut Self {
        *self *= Self::from_translation(v);
        self
    }

    /// Post-multiplies by a scale, i.e. scales the first three columns.
    pub fn scale(&mut self, v: Vector3) -> &mut Self {
        for row in 0..4 {
            self.data[row * 4] *= v.x;
            self.data[row * 4 + 1] *= v.y;
            self.data[row * 4 + 2] *= v.z;
        }
        self
    }

    /// Post-multiplies by a rotation of `radians` about `axis`.
    pub fn rotate(&mut self, radians: f64, axis: Vector3) -> &mut Self {
        *self *= Self::from_axis_angle(axis, radians);
        self
    }

    fn column3(&self, col: usize) -> Vector3 {
        Vector3::new(self.at(0, col), self.at(1, col), self.at(2, col))
    }

    /// Translation stored in the last column.
    pub fn translation(&self) -> Vector3 {
        self.column3(3)
    }

    /// Length of each basis column.
    pub fn scale_factors(&self) -> Vector3 {
        Vector3::new(
            self.column3(0).magnitude(),
            self.column3(1).magnitude(),
            self.column3(2).magnitude(),
        )
    }

    /// Rotation part as a unit quaternion.
    ///
    /// Scale is divided out of each basis column first; a zero scale factor
    /// leaves that column zeroed. The conversion picks the branch with the
    /// largest of the trace and the three diagonal terms so the square root
    /// never operates near zero.
    pub fn rotation(&self) -> Quaternion {
        let s = self.scale_factors();
        let inv = |f: f64| if f != 0.0 { 1.0 / f } else { 0.0 };
        let (isx, isy, isz) = (inv(s.x), inv(s.y), inv(s.z));

        let m00 = self.at(0, 0) * isx;
        let m01 = self.at(0, 1) * isy;
        let m02 = self.at(0, 2) * isz;
        let m10 = self.at(1, 0) * isx;
        let m11 = self.at(1, 1) * isy;
        let m12 = self.at(1, 2) * isz;
        let m20 = self.at(2, 0) * isx;
        let m21 = self.at(2, 1) * isy;
        let m22 = self.at(2, 2) * isz;

        let trace = m00 + m11 + m22;
        let q = if trace > 0.0 {
            let t = (trace + 1.0).sqrt();
            let inv_t = 0.5 / t;
            Quaternion::new((m21 - m12) * inv_t, (m02 - m20) * inv_t, (m10 - m01) * inv_t, 0.5 * t)
        } else if m00 >= m11 && m00 >= m22 {
            let t = (1.0 + m00 - m11 - m22).sqrt();
            let inv_t = 0.5 / t;
            Quaternion::new(0.5 * t, (m01 + m10) * inv_t, (m02 + m20) * inv_t, (m21 - m12) * inv_t)
        } else if m11 > m22 {
            let t = (1.0 + m11 - m00 - m22).sqrt();
            let inv_t = 0.5 / t;
            Quaternion::new((m01 + m10) * inv_t, 0.5 * t, (m12 + m21) * inv_t, (m02 - m20) * inv_t)
        } else {
            let t = (1.0 + m22 - m00 - m11).sqrt();
            let inv_t = 0.5 / t;
            Quaternion::new((m02 + m20) * inv_t, (m12 + m21) * inv_t, 0.5 * t, (m10 - m01) * inv_t)
        };

        q.normalized()
    }

    /// Unit forward direction (negative Z basis).
    pub fn forward(&self) -> Vector3 {
        (-self.column3(2)).normalized()
    }

    /// Unit up direction (Y basis).
    pub fn up(&self) -> Vector3 {
        self.column3(1).normalized()
    }

    /// Unit right direction (X basis).
    pub fn right(&self) -> Vector3 {
        self.column3(0).normalized()
    }

    /// Applies the transform to a point (`w = 1`).
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        (*self * p.extend(1.0)).truncate()
    }

    /// Applies the transform to a direction (`w = 0`), ignoring translation.
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        (*self * v.extend(0.0)).truncate()
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::from_scalar(0.0);
        for row in 0..4 {
            for col in 0..4 {
                out.data[col * 4 + row] = self.data[row * 4 + col];
            }
        }
        out
    }

    /// Right-handed perspective projection mapping depth to `[-1, 1]`.
    pub fn perspective(fov_y_rad: f64, aspect: f64, z_near: f64, z_far: f64) -> Self {
        let f = 1.0 / (fov_y_rad / 2.0).tan();

        let mut result = Self::from_scalar(0.0);
        *result.at_mut(0, 0) = f / aspect;
        *result.at_mut(1, 1) = f;
        *result.at_mut(2, 2) = -(z_far + z_near) / (z_far - z_near);
        *result.at_mut(2, 3) = -(2.0 * z_far * z_near) / (z_far - z_near);
        *result.at_mut(3, 2) = -1.0;
        result
    }

    /// Right-handed view matrix looking from `eye` towards `target`.
    pub fn look_at(eye: Vector3, target: Vector3, up: Vector3) -> Self {
        let f = (target - eye).normalized();
        let s = f.cross(up).normalized();
        let u = s.cross(f);

        Self::from_row_major([
            s.x, s.y, s.z, -s.dot(eye),
            u.x, u.y, u.z, -u.dot(eye),
            -f.x, -f.y, -f.z, f.dot(eye),
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Narrows to a column-major single-precision matrix for the render layer.
    pub fn to_mat4(&self) -> Mat4 {
        let t = self.transpose();
        Mat4::from_cols_array(&t.data.map(|v| v as f32))
    }

    pub fn abs_diff_eq(&self, rhs: &Self, epsilon: f64) -> bool {
        self.data
            .iter()
            .zip(rhs.data.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Index<usize> for Transform {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<usize> for Transform {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.data[index]
    }
}

impl Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [0.0; 16];
        for row in 0..4 {
            let r0 = row * 4;
            for col in 0..4 {
                out[r0 + col] = self.data[r0] * rhs.data[col]
                    + self.data[r0 + 1] * rhs.data[4 + col]
                    + self.data[r0 + 2] * rhs.data[8 + col]
                    + self.data[r0 + 3] * rhs.data[12 + col];
            }
        }
        Self { data: out }
    }
}

impl MulAssign for Transform {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vector4> for Transform {
    type Output = Vector4;

    fn mul(self, v: Vector4) -> Vector4 {
        let row = |r: usize| {
            self.data[r * 4] * v.x
                + self.data[r * 4 + 1] * v.y
                + self.data[r * 4 + 2] * v.z
                + self.data[r * 4 + 3] * v.w
        };
        Vector4::new(row(0), row(1), row(2), row(3))
    }
}

impl From<Quaternion> for Transform {
    fn from(q: Quaternion) -> Self {
        Self::from_quaternion(q)
    }
}
