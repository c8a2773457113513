//! Render boundary.
//!
//! This crate converts scene data into GPU-ready form:
//! - Uniform buffer layouts ([`CameraUbo`], [`ObjectUbo`], [`LightUbo`])
//! - [`DrawList`], a render sink recording one frame of draws
//!
//! Scene math is `f64`; everything here is narrowed to `f32`.

mod draw_list;
mod ubo;

pub use draw_list::{DrawCommand, DrawList, FrameStats, MAX_LIGHTS};
pub use ubo::{CameraUbo, LightUbo, ObjectUbo};
