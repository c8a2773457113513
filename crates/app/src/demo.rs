//! The demo scene.

use anyhow::{Context, Result};
use orrery_core::EngineConfig;
use orrery_math::Vector3;
use orrery_resources::ResourceContext;
use orrery_scene::{
    FollowController, FpsController, Light, NodeDesc, NodeId, Renderable, Scene,
};
use tracing::info;

use crate::ship::ShipPrefab;

/// Ids of the nodes the frame loop reports on.
#[derive(Clone, Copy, Debug)]
pub struct DemoNodes {
    pub ship: NodeId,
    pub observer: NodeId,
}

/// Populate `scene` with the ship, a ground plane, lights and an observer.
pub fn build(
    scene: &mut Scene,
    resources: &mut ResourceContext,
    config: &EngineConfig,
) -> Result<DemoNodes> {
    let default_shader = resources
        .shader("default")
        .context("Failed to load default shader")?;
    let emissive_shader = resources
        .shader("emissive")
        .context("Failed to load emissive shader")?;
    let fighter = resources
        .model("fighter.obj")
        .context("Failed to load ship model")?;
    let sphere = resources
        .model("sphere.obj")
        .context("Failed to load sphere model")?;
    let ground = resources
        .model("ground.obj")
        .context("Failed to load ground model")?;

    let ship = scene.spawn(
        &ShipPrefab {
            aspect_ratio: config.aspect_ratio,
            camera: config.camera.clone(),
            hull: Renderable::new(fighter.clone(), default_shader.clone()),
            exhaust: Renderable::new(sphere.clone(), emissive_shader.clone()),
        },
        None,
    )?;

    scene.create_node(
        NodeDesc::new("ground")
            .with_position(Vector3::new(0.0, -50.0, 0.0))
            .with_scale(Vector3::new(4000.0, 1.0, 4000.0))
            .with_renderable(Renderable::new(ground, default_shader.clone())),
    )?;

    scene.create_node(
        NodeDesc::new("sun")
            .with_position(Vector3::new(0.0, 500.0, 0.0))
            .with_scale(Vector3::splat(20.0))
            .with_light(Light::new(Vector3::new(1.0, 0.95, 0.9), 0.2))
            .with_renderable(Renderable::new(sphere.clone(), emissive_shader.clone())),
    )?;

    scene.create_node(
        NodeDesc::new("beacon")
            .with_light(Light::new(Vector3::new(0.3, 0.5, 1.0), 0.1))
            .with_controller(FollowController::new(ship, Vector3::new(0.0, 20.0, 0.0))),
    )?;

    let observer = scene.create_node(
        NodeDesc::new("observer")
            .with_position(Vector3::new(0.0, 10.0, 1050.0))
            .with_renderable(Renderable::new(fighter, default_shader))
            .with_controller(FpsController::new(
                config.controller.move_speed,
                config.controller.look_speed_deg,
            )),
    )?;

    info!(
        "Demo scene built: {} nodes, {} shaders and {} models loaded",
        scene.len(),
        resources.shaders.active_count(),
        resources.models.active_count()
    );
    Ok(DemoNodes { ship, observer })
}
