//! Uniform buffer object definitions for shaders.
//!
//! These are the single-precision, GPU-layout views of scene data. All
//! structures use `#[repr(C)]` for predictable memory layout and implement
//! `Pod` and `Zeroable` for safe byte casting.
//!
//! # GPU Memory Layout
//!
//! All structures follow std140 rules:
//! - `Mat4` is 64 bytes
//! - `Vec3` is 12 bytes and is padded out to 16
//!
//! # Example
//!
//! ```
//! use orrery_math::Transform;
//! use orrery_renderer::{CameraUbo, ObjectUbo};
//!
//! let camera = CameraUbo::from_transforms(
//!     &Transform::IDENTITY,
//!     &Transform::perspective(1.0, 16.0 / 9.0, 0.1, 100.0),
//!     orrery_math::Vector3::ZERO,
//! );
//! let object = ObjectUbo::from_transform(&Transform::IDENTITY);
//!
//! let camera_bytes: &[u8] = bytemuck::bytes_of(&camera);
//! assert_eq!(camera_bytes.len(), CameraUbo::SIZE);
//! assert_eq!(bytemuck::bytes_of(&object).len(), ObjectUbo::SIZE);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use orrery_math::{Transform, Vector3};
use orrery_scene::{CameraView, LightView};

/// Camera uniform buffer data.
///
/// # Memory Layout
///
/// | Offset | Size | Field |
/// |--------|------|-------|
/// | 0      | 64   | view |
/// | 64     | 64   | projection |
/// | 128    | 64   | view_projection |
/// | 192    | 12   | camera_position |
/// | 204    | 4    | _padding |
///
/// Total size: 208 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct CameraUbo {
    /// World to view space.
    pub view: Mat4,
    /// View to clip space.
    pub projection: Mat4,
    /// Pre-computed `projection * view`.
    pub view_projection: Mat4,
    /// Camera world position.
    pub camera_position: Vec3,
    pub _padding: f32,
}

impl CameraUbo {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Narrows double-precision scene matrices.
    ///
    /// The product is formed in `f64` before narrowing.
    pub fn from_transforms(view: &Transform, projection: &Transform, position: Vector3) -> Self {
        Self {
            view: view.to_mat4(),
            projection: projection.to_mat4(),
            view_projection: (*projection * *view).to_mat4(),
            camera_position: position.to_vec3(),
            _padding: 0.0,
        }
    }
}

impl From<&CameraView> for CameraUbo {
    fn from(camera: &CameraView) -> Self {
        Self::from_transforms(&camera.view, &camera.projection, camera.position)
    }
}

/// Object uniform buffer data.
///
/// # Memory Layout
///
/// - Offset 0: model matrix (64 bytes)
/// - Offset 64: normal matrix (64 bytes)
/// - Total size: 128 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ObjectUbo {
    /// Object to world space.
    pub model: Mat4,
    /// Inverse transpose of `model`, for transforming normals.
    pub normal_matrix: Mat4,
}

impl ObjectUbo {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Creates a new object UBO from a model matrix.
    ///
    /// If the model matrix is not invertible (e.g. zero scale) the normal
    /// matrix falls back to identity instead of filling with NaN.
    pub fn new(model: Mat4) -> Self {
        const EPSILON: f32 = 1e-6;
        let normal_matrix = if model.determinant().abs() < EPSILON {
            Mat4::IDENTITY
        } else {
            model.inverse().transpose()
        };
        Self {
            model,
            normal_matrix,
        }
    }

    /// Narrows a scene global transform.
    pub fn from_transform(model: &Transform) -> Self {
        Self::new(model.to_mat4())
    }}

/// Light uniform buffer data.
///
/// # Memory Layout
///
/// | Offset | Size | Field |
/// |--------|------|-------|
/// | 0      | 12   | position |
/// | 12     | 4    | strength |
/// | 16     | 12   | color |
/// | 28     | 4    | _padding |
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightUbo {
    /// Light position in world space.
    pub position: Vec3,
    /// Ambient strength.
    pub strength: f32,
    /// Linear RGB color.
    pub color: Vec3,
    pub _padding: f32,
}

impl LightUbo {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn new(position: Vec3, color: Vec3, strength: f32) -> Self {
        Self {
            position,
            strength,
            color,
            _padding: 0.0,
        }
    }
}

impl From<&LightView> for LightUbo {
    fn from(light: &LightView) -> Self {
        Self::new(
            light.position.to_vec3(),
            light.color.to_vec3(),
            light.strength as f32,
        )
    }
}
