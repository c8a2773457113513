//! The player ship prefab.

use orrery_core::CameraConfig;
use orrery_math::Vector3;
use orrery_scene::{
    Camera, Light, NodeDesc, NodeId, Prefab, Renderable, Scene, SceneResult, SmoothTiltController,
    ThrustController,
};

/// Where a freshly spawned ship starts.
pub const SPAWN_POSITION: Vector3 = Vector3::new(0.0, 0.0, 1000.0);

/// Chase camera offset from the ship root.
pub const CAMERA_OFFSET: Vector3 = Vector3::new(0.0, 5.0, 15.0);

/// A steerable ship with a chase camera.
///
/// ```text
/// ship (ThrustController)
/// ├── ship-camera
/// └── ship-mesh (SmoothTiltController)
///     └── ship-exhaust (light)
/// ```
pub struct ShipPrefab {
    pub aspect_ratio: f64,
    pub camera: CameraConfig,
    pub hull: Renderable,
    pub exhaust: Renderable,
}

impl Prefab for ShipPrefab {
    fn instantiate(&self, scene: &mut Scene, parent: Option<NodeId>) -> SceneResult<NodeId> {
        let root_desc = NodeDesc::new("ship")
            .with_position(SPAWN_POSITION)
            .with_controller(ThrustController::new());
        let root = match parent {
            Some(parent) => scene.create_child(root_desc, parent)?,
            None => scene.create_node(root_desc)?,
        };

        scene.create_child(
            NodeDesc::new("ship-camera")
                .with_position(CAMERA_OFFSET)
                .with_camera(Camera::perspective(
                    self.camera.fov_deg,
                    self.aspect_ratio,
                    self.camera.near,
                    self.camera.far,
                )),
            root,
        )?;

        let mesh = scene.create_child(
            NodeDesc::new("ship-mesh")
                .with_renderable(self.hull.clone())
                .with_controller(SmoothTiltController::new()),
            root,
        )?;

        scene.create_child(
            NodeDesc::new("ship-exhaust")
                .with_position(Vector3::new(0.0, 0.0, 3.0))
                .with_scale(Vector3::splat(0.5))
                .with_light(Light::new(Vector3::ONE, 0.4))
                .with_renderable(self.exhaust.clone()),
            mesh,
        )?;

        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::rc::Rc;

    use orrery_resources::{Blob, ShaderSource};
    use orrery_scene::NodeProperties;

    fn renderable(model: &str) -> Renderable {
        Renderable::new(
            Rc::new(Blob {
                name: model.to_string(),
                path: PathBuf::from(model),
                bytes: vec![1],
            }),
            Rc::new(ShaderSource {
                name: "default".to_string(),
                vertex: "v".to_string(),
                fragment: "f".to_string(),
            }),
        )
    }

    fn prefab() -> ShipPrefab {
        ShipPrefab {
            aspect_ratio: 16.0 / 9.0,
            camera: CameraConfig::default(),
            hull: renderable("fighter.obj"),
            exhaust: renderable("sphere.obj"),
        }
    }

    #[test]
    fn test_ship_hierarchy() {
        let mut scene = Scene::new();
        let ship = scene.spawn(&prefab(), None).unwrap();

        assert_eq!(scene.len(), 4);
        assert!(scene.node(ship).unwrap().has_controller());

        let camera = scene.camera().unwrap();
        assert_eq!(scene.parent(camera), Some(ship));

        let mesh = scene.find_by_name("ship-mesh").unwrap();
        let exhaust = scene.find_by_name("ship-exhaust").unwrap();
        assert_eq!(scene.parent(exhaust), Some(mesh));
        let exhaust_node = scene.node(exhaust).unwrap();
        assert!(exhaust_node.has_property(NodeProperties::AREA_LIGHT | NodeProperties::RENDERABLE));

        let world = scene.global_transform(exhaust).unwrap();
        assert!(
            world
                .translation()
                .abs_diff_eq(Vector3::new(0.0, 0.0, 1003.0), 1e-9)
        );
    }

    #[test]
    fn test_ship_flies_forward_when_idle() {
        let mut scene = Scene::new();
        let ship = scene.spawn(&prefab(), None).unwrap();
        for _ in 0..10 {
            scene.update(0.1);
        }
        let position = scene.node(ship).unwrap().position();
        assert!(position.z < SPAWN_POSITION.z);
        assert!(position.x.abs() < 1e-9);
    }
}
