//! Scene graph.
//!
//! This crate provides the hierarchical node model:
//! - [`Scene`]: owning registry of [`Node`]s with parent/child links by id
//! - Lazily cached local and global transforms with dirty propagation
//! - [`Controller`]s run every frame against a [`NodeMut`]
//! - Camera and light payloads, and a [`RenderSink`] draw interface
//! - [`Prefab`]s for spawning node subtrees

mod camera;
mod controller;
mod error;
mod input;
mod light;
mod node;
mod prefab;
mod render;
mod scene;

pub use camera::Camera;
pub use controller::{
    Controller, FollowController, FpsController, SmoothTiltController, ThrustController,
};
pub use error::{SceneError, SceneResult};
pub use input::{FrameInput, InputSource};
pub use light::Light;
pub use node::{Node, NodeDesc, NodeId, NodeProperties};
pub use prefab::Prefab;
pub use render::{CameraView, DrawItem, LightView, RenderSink, Renderable};
pub use scene::{NodeMut, Scene};
