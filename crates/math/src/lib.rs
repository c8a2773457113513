//! Math kernel for the scene graph.
//!
//! This crate provides the double-precision value types every other crate
//! builds on:
//! - [`Vector2`], [`Vector3`], [`Vector4`]
//! - [`Quaternion`] for rotations
//! - [`Transform`], a row-major 4x4 homogeneous matrix
//!
//! Everything here is `f64`. Conversions to `glam`'s single-precision types
//! (`to_vec3`, `to_quat`, `to_mat4`) exist only for handing data to the
//! render layer.

pub mod angle;
mod quaternion;
mod transform;
mod vector;

pub use quaternion::Quaternion;
pub use transform::Transform;
pub use vector::{Vector2, Vector3, Vector4};
