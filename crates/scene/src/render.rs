//! The interface between the scene and whatever draws it.

use orrery_math::{Transform, Vector3};
use orrery_resources::{ModelHandle, ShaderHandle, TextureHandle};

use crate::node::NodeId;

/// Render payload: opaque handles into the resource caches.
///
/// Handles are reference counted, so a swept node releases its assets.
#[derive(Clone, Debug)]
pub struct Renderable {
    pub model: ModelHandle,
    pub shader: ShaderHandle,
    pub texture: Option<TextureHandle>,
}

impl Renderable {
    pub fn new(model: ModelHandle, shader: ShaderHandle) -> Self {
        Self {
            model,
            shader,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }
}

/// The active camera for a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraView {
    pub node: NodeId,
    pub position: Vector3,
    pub view: Transform,
    pub projection: Transform,
}

/// A light as seen from world space.
#[derive(Clone, Debug, PartialEq)]
pub struct LightView {
    pub node: NodeId,
    pub position: Vector3,
    pub color: Vector3,
    pub strength: f64,
}

/// One renderable node to draw.
#[derive(Clone, Copy, Debug)]
pub struct DrawItem<'a> {
    pub node: NodeId,
    pub model: Transform,
    pub renderable: &'a Renderable,
}

/// Receives the draws produced by [`Scene::render`](crate::Scene::render).
///
/// A frame is `begin_frame`, one `draw` per renderable node, then `end_frame`.
pub trait RenderSink {
    fn begin_frame(&mut self, camera: &CameraView, lights: &[LightView]);

    fn draw(&mut self, item: &DrawItem<'_>);

    fn end_frame(&mut self) {}
}
