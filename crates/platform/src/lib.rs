//! Platform input for the scene.
//!
//! This crate turns keyboard and mouse events into the movement vector and
//! cursor delta the scene's controllers consume:
//! - [`InputState`]: pressed / just-pressed tracking and cursor capture
//! - `InputSource` implementation mapping WASD and arrow keys to axes

mod input;

pub use input::{InputState, KeyCode, MouseButton};
