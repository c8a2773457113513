//! Recording render sink.
//!
//! [`DrawList`] is the hand-off point between the scene and a GPU backend: it
//! receives one frame of draws from [`Scene::render`] and stores them as
//! upload-ready uniform data.
//!
//! [`Scene::render`]: orrery_scene::Scene::render

use std::collections::BTreeMap;

use orrery_scene::{CameraView, DrawItem, LightView, NodeId, RenderSink, Renderable};
use tracing::{debug, warn};

use crate::ubo::{CameraUbo, LightUbo, ObjectUbo};

/// Maximum number of lights uploaded per frame.
pub const MAX_LIGHTS: usize = 16;

/// One recorded draw.
#[derive(Clone, Debug)]
pub struct DrawCommand {
    pub node: NodeId,
    pub object: ObjectUbo,
    pub renderable: Renderable,
}

/// Summary of the last recorded frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draws: usize,
    pub lights: usize,
    pub dropped_lights: usize,
}

/// A [`RenderSink`] that keeps the most recent frame.
#[derive(Debug, Default)]
pub struct DrawList {
    camera: CameraUbo,
    lights: Vec<LightUbo>,
    commands: Vec<DrawCommand>,
    frames_recorded: u64,
    stats: FrameStats,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn camera(&self) -> &CameraUbo {
        &self.camera
    }

    pub fn lights(&self) -> &[LightUbo] {
        &self.lights
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn frames_recorded(&self) -> u64 {
        self.frames_recorded
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Number of draws per shader name, for batching decisions.
    pub fn shader_batches(&self) -> BTreeMap<&str, usize> {
        let mut batches = BTreeMap::new();
        for command in &self.commands {
            *batches
                .entry(command.renderable.shader.name.as_str())
                .or_insert(0) += 1;
        }
        batches
    }
}

impl RenderSink for DrawList {
    fn begin_frame(&mut self, camera: &CameraView, lights: &[LightView]) {
        self.commands.clear();
        self.camera = CameraUbo::from(camera);

        let dropped = lights.len().saturating_sub(MAX_LIGHTS);
        if dropped > 0 {
            warn!(
                "{} lights in scene, only the first {} are uploaded",
                lights.len(),
                MAX_LIGHTS
            );
        }
        self.lights = lights.iter().take(MAX_LIGHTS).map(LightUbo::from).collect();
        self.stats = FrameStats {
            draws: 0,
            lights: self.lights.len(),
            dropped_lights: dropped,
        };
    }

    fn draw(&mut self, item: &DrawItem<'_>) {
        self.commands.push(DrawCommand {
            node: item.node,
            object: ObjectUbo::from_transform(&item.model),
            renderable: item.renderable.clone(),
        });
    }

    fn end_frame(&mut self) {
        self.frames_recorded += 1;
        self.stats.draws = self.commands.len();
        debug!(
            "Recorded frame {}: {} draws, {} lights",
            self.frames_recorded, self.stats.draws, self.stats.lights
        );
    }
}
