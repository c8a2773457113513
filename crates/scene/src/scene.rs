//! The scene: node registry, hierarchy and per-frame update.
//!
//! # Example
//!
//! ```
//! use orrery_math::Vector3;
//! use orrery_scene::{NodeDesc, Scene};
//!
//! let mut scene = Scene::new();
//! let parent = scene
//!     .create_node(NodeDesc::new("parent").with_position(Vector3::new(10.0, 0.0, 0.0)))
//!     .unwrap();
//! let child = scene
//!     .create_child(NodeDesc::new("child").with_position(Vector3::new(0.0, 5.0, 0.0)), parent)
//!     .unwrap();
//!
//! let world = scene.global_transform(child).unwrap();
//! assert_eq!(world.translation(), Vector3::new(10.0, 5.0, 0.0));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use orrery_math::{Quaternion, Transform, Vector3};
use tracing::{debug, info, warn};

use crate::camera::Camera;
use crate::controller::Controller;
use crate::error::{SceneError, SceneResult};
use crate::input::{FrameInput, InputSource};
use crate::light::Light;
use crate::node::{Node, NodeDesc, NodeId, NodeProperties};
use crate::prefab::Prefab;
use crate::render::{CameraView, DrawItem, LightView, RenderSink};

/// Owning registry of nodes.
///
/// Nodes refer to each other by [`NodeId`] only. Removal is two-phase: hierarchy
/// calls mark nodes for deletion and [`Scene::purge_deleted`] sweeps them, so no
/// id handed out during a frame dangles before the next update.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u64,
    camera: Option<NodeId>,
    lights: BTreeSet<NodeId>,
    renderables: BTreeSet<NodeId>,
    input: FrameInput,
}

impl Scene {
    pub fn new() -> Self {
        info!("Creating scene");
        Self::default()
    }

    // Registry

    /// Create a root node.
    pub fn create_node(&mut self, desc: NodeDesc) -> SceneResult<NodeId> {
        self.check_camera_slot(&desc)?;
        Ok(self.insert(desc))
    }

    /// Create a node directly under `parent`.
    pub fn create_child(&mut self, desc: NodeDesc, parent: NodeId) -> SceneResult<NodeId> {
        self.check_live(parent)?;
        self.check_camera_slot(&desc)?;
        let id = self.insert(desc);
        self.attach(parent, id);
        Ok(id)
    }

    /// Instantiate a prefab under an optional parent.
    ///
    /// If the prefab fails partway, every node it created is removed again
    /// before the error is returned.
    pub fn spawn(&mut self, prefab: &impl Prefab, parent: Option<NodeId>) -> SceneResult<NodeId> {
        let first = NodeId::new(self.next_id + 1);
        prefab.instantiate(self, parent).inspect_err(|err| {
            let created = self.discard_from(first);
            warn!("Prefab failed ({}), discarded {} node(s)", err, created);
        })
    }

    /// Unregister every node with an id at or above `first`.
    fn discard_from(&mut self, first: NodeId) -> usize {
        let created = self.nodes.split_off(&first);
        for (id, node) in &created {
            if let Some(parent) = node.parent
                && let Some(parent) = self.nodes.get_mut(&parent)
            {
                parent.children.remove(id);
            }
            for child in node.children() {
                if let Some(survivor) = self.nodes.get_mut(&child) {
                    survivor.parent = None;
                    self.mark_global_dirty(child);
                }
            }
            self.lights.remove(id);
            self.renderables.remove(id);
            if self.camera == Some(*id) {
                self.camera = None;
            }
        }
        created.len()
    }

    fn check_camera_slot(&self, desc: &NodeDesc) -> SceneResult<()> {
        match self.camera {
            Some(existing) if desc.camera.is_some() => {
                Err(SceneError::CameraAlreadyRegistered(existing))
            }
            _ => Ok(()),
        }
    }

    fn insert(&mut self, desc: NodeDesc) -> NodeId {
        self.next_id += 1;
        let id = NodeId::new(self.next_id);
        let node = Node::new(id, desc);

        let properties = node.properties();
        if properties.contains(NodeProperties::CAMERA) {
            self.camera = Some(id);
        }
        if properties.contains(NodeProperties::AREA_LIGHT) {
            self.lights.insert(id);
        }
        if properties.contains(NodeProperties::RENDERABLE) {
            self.renderables.insert(id);
        }

        debug!("Created {} '{}' ({:?})", id, node.name(), properties);
        self.nodes.insert(id, node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Mutable handle to a node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        if self.nodes.contains_key(&id) {
            Some(NodeMut { scene: self, id })
        } else {
            None
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Finds the first node with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|node| node.name() == name)
            .map(Node::id)
    }

    pub fn camera(&self) -> Option<NodeId> {
        self.camera
    }

    pub fn lights(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.lights.iter().copied()
    }

    pub fn renderables(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.renderables.iter().copied()
    }

    /// Update the aspect ratio of the registered camera, if any.
    pub fn set_aspect(&mut self, aspect: f64) {
        if let Some(camera) = self
            .camera
            .and_then(|id| self.nodes.get_mut(&id))
            .and_then(|node| node.camera.as_mut())
        {
            camera.set_aspect(aspect);
        }
    }

    // Traversal

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&id)
            .map(|node| node.children().collect())
            .unwrap_or_default()
    }

    /// Every node below `id`, depth first, children in creation order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(node) = self.nodes.get(&next) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Nodes without a parent, in creation order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .values()
            .filter(|node| node.parent.is_none())
            .map(Node::id)
    }

    fn is_ancestor(&self, ancestor: NodeId, of: NodeId) -> bool {
        let mut current = self.parent(of);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // Hierarchy

    /// Attach `child` under `parent`.
    ///
    /// Fails without changing anything if either node is missing or pending
    /// deletion, if `child` is `parent`, if `child` already has a parent, or if
    /// `child` is an ancestor of `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        if parent == child {
            return Err(SceneError::SelfParenting(parent));
        }
        self.check_live(parent)?;
        self.check_live(child)?;
        if let Some(existing) = self.parent(child) {
            return Err(SceneError::AlreadyParented {
                child,
                parent: existing,
            });
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::WouldCycle { parent, child });
        }
        self.attach(parent, child);
        Ok(())
    }

    fn check_live(&self, id: NodeId) -> SceneResult<()> {
        match self.nodes.get(&id) {
            None => Err(SceneError::NodeNotFound(id)),
            Some(node) if node.pending_deletion => Err(SceneError::PendingDeletion(id)),
            Some(_) => Ok(()),
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.insert(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        self.mark_global_dirty(child);
        debug!("Attached {} under {}", child, parent);
    }

    /// Detach `child` from `parent`. Returns `false` if it was not a child.
    pub fn detach_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let removed = self
            .nodes
            .get_mut(&parent)
            .is_some_and(|node| node.children.remove(&child));
        if !removed {
            return false;
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = None;
        }
        self.mark_global_dirty(child);
        debug!("Detached {} from {}", child, parent);
        true
    }

    /// Detach `id` from its parent. Returns `false` if it had none.
    pub fn detach_from_parent(&mut self, id: NodeId) -> bool {
        match self.parent(id) {
            Some(parent) => self.detach_child(parent, id),
            None => false,
        }
    }

    /// Mark `child` and all of its descendants for deletion.
    ///
    /// The nodes stay in the scene, and `child` stays in `parent`'s children,
    /// until the next [`purge_deleted`](Self::purge_deleted).
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        let node = self
            .nodes
            .get(&parent)
            .ok_or(SceneError::NodeNotFound(parent))?;
        if !node.has_child(child) {
            return Err(SceneError::NotAChild { parent, child });
        }
        self.mark_for_deletion(child);
        Ok(())
    }

    /// Mark any node, and its subtree, for deletion.
    pub fn remove_node(&mut self, id: NodeId) -> SceneResult<()> {
        if !self.nodes.contains_key(&id) {
            return Err(SceneError::NodeNotFound(id));
        }
        self.mark_for_deletion(id);
        Ok(())
    }

    fn mark_for_deletion(&mut self, id: NodeId) {
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for victim in &doomed {
            if let Some(node) = self.nodes.get_mut(victim) {
                node.pending_deletion = true;
            }
        }
        debug!("Marked {} node(s) under {} for deletion", doomed.len(), id);
    }

    /// Remove every node marked for deletion. Returns how many were removed.
    pub fn purge_deleted(&mut self) -> usize {
        let doomed: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|node| node.pending_deletion)
            .map(Node::id)
            .collect();
        if doomed.is_empty() {
            return 0;
        }

        for id in &doomed {
            let Some(node) = self.nodes.remove(id) else {
                continue;
            };
            if let Some(parent) = node.parent
                && let Some(parent) = self.nodes.get_mut(&parent)
            {
                parent.children.remove(id);
            }
            for child in node.children() {
                if let Some(orphan) = self.nodes.get_mut(&child)
                    && !orphan.pending_deletion
                {
                    orphan.parent = None;
                    self.mark_global_dirty(child);
                }
            }
            self.lights.remove(id);
            self.renderables.remove(id);
            if self.camera == Some(*id) {
                self.camera = None;
            }
        }

        debug!("Purged {} node(s)", doomed.len());
        doomed.len()
    }

    // Transforms

    /// Local matrix of `id`.
    pub fn local_transform(&self, id: NodeId) -> Option<Transform> {
        self.nodes.get(&id).map(Node::local_transform)
    }

    /// World matrix of `id`: `parent.global * local`, or `local` for a root.
    ///
    /// Recomputed only when the node is globally dirty; the parent chain is
    /// walked the same way, so each matrix is rebuilt at most once per change.
    pub fn global_transform(&self, id: NodeId) -> Option<Transform> {
        let node = self.nodes.get(&id)?;
        if node.global_dirty.get() {
            let local = node.local_transform();
            let global = match node.parent.and_then(|parent| self.global_transform(parent)) {
                Some(parent) => parent * local,
                None => local,
            };
            node.global.set(global);
            node.global_dirty.set(false);
        }
        Some(node.global.get())
    }

    /// Set local dirty on `id`, and global dirty on it and its subtree.
    fn mark_transform_dirty(&self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        // Already dirty means the subtree was flagged when it became dirty.
        if node.local_dirty.get() {
            return;
        }
        node.local_dirty.set(true);
        self.mark_global_dirty(id);
    }

    fn mark_global_dirty(&self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get(&next) {
                node.global_dirty.set(true);
                stack.extend(node.children.iter().copied());
            }
        }
    }

    // Frame

    /// Input snapshot controllers will see on the next update.
    pub fn set_input(&mut self, input: FrameInput) {
        self.input = input;
    }

    /// Snapshot `source` for the next update.
    pub fn poll_input(&mut self, source: &(impl InputSource + ?Sized)) {
        self.input = FrameInput::capture(source);
    }

    pub fn input(&self) -> FrameInput {
        self.input
    }

    /// Advance the scene by `delta_t` seconds.
    ///
    /// Sweeps deleted nodes, then for every node in creation order runs its
    /// controller and integrates its velocity into its position.
    pub fn update(&mut self, delta_t: f64) {
        self.purge_deleted();

        let ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        for id in ids {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            if let Some(mut controller) = node.controller.take() {
                controller.update(&mut NodeMut { scene: self, id }, delta_t);
                // A controller may have installed a replacement for itself.
                if let Some(node) = self.nodes.get_mut(&id)
                    && node.controller.is_none()
                {
                    node.controller = Some(controller);
                }
            }
            self.integrate(id, delta_t);
        }
    }

    fn integrate(&mut self, id: NodeId, delta_t: f64) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if node.velocity == Vector3::ZERO {
            return;
        }
        node.position += node.velocity * delta_t;
        self.mark_transform_dirty(id);
    }

    /// Draw every renderable node through `sink`. Returns the number of draws.
    ///
    /// Fails with [`SceneError::NoCamera`] if no camera is registered.
    pub fn render(&self, sink: &mut impl RenderSink) -> SceneResult<usize> {
        let camera_id = self.camera.ok_or(SceneError::NoCamera)?;
        let global = self
            .global_transform(camera_id)
            .ok_or(SceneError::NodeNotFound(camera_id))?;
        let camera = self
            .nodes
            .get(&camera_id)
            .and_then(Node::camera)
            .ok_or(SceneError::NoCamera)?;

        let view = CameraView {
            node: camera_id,
            position: global.translation(),
            view: Camera::view_from(&global),
            projection: *camera.projection(),
        };

        let lights: Vec<LightView> = self
            .lights
            .iter()
            .filter_map(|&id| {
                let node = self.nodes.get(&id)?;
                let light: &Light = node.light()?;
                Some(LightView {
                    node: id,
                    position: self.global_transform(id)?.translation(),
                    color: light.color,
                    strength: light.strength,
                })
            })
            .collect();
        if lights.is_empty() {
            warn!("Rendering scene without lights");
        }

        sink.begin_frame(&view, &lights);
        let mut draws = 0;
        for &id in &self.renderables {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if node.pending_deletion {
                continue;
            }
            let (Some(renderable), Some(model)) = (node.renderable(), self.global_transform(id))
            else {
                continue;
            };
            sink.draw(&DrawItem {
                node: id,
                model,
                renderable,
            });
            draws += 1;
        }
        sink.end_frame();
        Ok(draws)
    }
}

/// Mutable access to one node of a scene.
///
/// Transform setters flag the node and its subtree dirty. The handle also
/// exposes the rest of the scene read-only, plus the frame's input, which is
/// what controllers work with.
pub struct NodeMut<'a> {
    scene: &'a mut Scene,
    id: NodeId,
}

impl NodeMut<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node itself.
    pub fn node(&self) -> &Node {
        // A handle is only created for a node present in the scene, and nothing
        // reachable through it removes nodes.
        &self.scene.nodes[&self.id]
    }

    fn node_mut(&mut self) -> &mut Node {
        self.scene
            .nodes
            .get_mut(&self.id)
            .unwrap_or_else(|| unreachable!("handle outlived its node"))
    }

    /// The whole scene, read-only.
    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn input(&self) -> FrameInput {
        self.scene.input
    }

    pub fn position(&self) -> Vector3 {
        self.node().position
    }

    pub fn rotation(&self) -> Quaternion {
        self.node().rotation
    }

    pub fn scale(&self) -> Vector3 {
        self.node().scale
    }

    pub fn velocity(&self) -> Vector3 {
        self.node().velocity
    }

    pub fn set_position(&mut self, position: Vector3) -> &mut Self {
        self.node_mut().position = position;
        self.scene.mark_transform_dirty(self.id);
        self
    }

    /// Replace the rotation. The value is stored normalized.
    pub fn set_rotation(&mut self, rotation: Quaternion) -> &mut Self {
        self.node_mut().rotation = rotation.normalized();
        self.scene.mark_transform_dirty(self.id);
        self
    }

    /// Replace the rotation with `(pitch, yaw, roll)` in radians.
    pub fn set_rotation_euler(&mut self, euler: Vector3) -> &mut Self {
        self.set_rotation(Quaternion::from_euler(euler))
    }

    pub fn set_rotation_euler_deg(&mut self, euler_deg: Vector3) -> &mut Self {
        self.set_rotation_euler(euler_deg.to_radians())
    }

    /// Apply `delta` in parent space: `rotation = normalize(delta * rotation)`.
    pub fn rotate(&mut self, delta: Quaternion) -> &mut Self {
        let rotation = delta.compose(self.node().rotation);
        self.set_rotation(rotation)
    }

    pub fn rotate_euler(&mut self, euler: Vector3) -> &mut Self {
        self.rotate(Quaternion::from_euler(euler))
    }

    pub fn rotate_euler_deg(&mut self, euler_deg: Vector3) -> &mut Self {
        self.rotate_euler(euler_deg.to_radians())
    }

    pub fn set_scale(&mut self, scale: Vector3) -> &mut Self {
        self.node_mut().scale = scale;
        self.scene.mark_transform_dirty(self.id);
        self
    }

    /// Velocity in units per second. Applied during [`Scene::update`].
    pub fn set_velocity(&mut self, velocity: Vector3) -> &mut Self {
        self.node_mut().velocity = velocity;
        self
    }

    pub fn local_transform(&self) -> Transform {
        self.node().local_transform()
    }

    pub fn global_transform(&self) -> Transform {
        self.scene
            .global_transform(self.id)
            .unwrap_or_else(|| self.node().local_transform())
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.node_mut().camera.as_mut()
    }

    pub fn light_mut(&mut self) -> Option<&mut Light> {
        self.node_mut().light.as_mut()
    }

    pub fn set_controller(&mut self, controller: impl Controller + 'static) -> &mut Self {
        self.node_mut().controller = Some(Box::new(controller));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Renderable;
    use orrery_math::Vector2;
    use orrery_resources::{Blob, ShaderSource};
    use std::path::PathBuf;
    use std::rc::Rc;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn renderable() -> Renderable {
        let model = Rc::new(Blob {
            name: "cube.obj".to_string(),
            path: PathBuf::from("models/cube.obj"),
            bytes: b"v 0 0 0".to_vec(),
        });
        let shader = Rc::new(ShaderSource {
            name: "default".to_string(),
            vertex: "void main() {}".to_string(),
            fragment: "void main() {}".to_string(),
        });
        Renderable::new(model, shader)
    }

    #[derive(Default)]
    struct RecordingSink {
        frames: usize,
        camera: Option<CameraView>,
        lights: Vec<LightView>,
        draws: Vec<(NodeId, Transform)>,
    }

    impl RenderSink for RecordingSink {
        fn begin_frame(&mut self, camera: &CameraView, lights: &[LightView]) {
            self.frames += 1;
            self.camera = Some(camera.clone());
            self.lights = lights.to_vec();
        }

        fn draw(&mut self, item: &DrawItem<'_>) {
            self.draws.push((item.node, item.model));
        }
    }

    fn node(scene: &mut Scene, name: &str) -> NodeId {
        scene.create_node(NodeDesc::new(name)).unwrap()
    }

    #[test]
    fn test_fresh_node_global_is_identity() {
        let mut scene = Scene::new();
        let id = node(&mut scene, "fresh");

        assert!(scene.node(id).unwrap().is_global_dirty());
        assert_eq!(scene.global_transform(id), Some(Transform::IDENTITY));
        assert!(!scene.node(id).unwrap().is_global_dirty());
    }

    #[test]
    fn test_set_position_fills_translation_column() {
        let mut scene = Scene::new();
        let id = node(&mut scene, "mover");
        scene
            .node_mut(id)
            .unwrap()
            .set_position(Vector3::new(1.5, -2.0, 7.0));

        let t = scene.global_transform(id).unwrap();
        assert!(approx_eq(t.at(0, 3), 1.5));
        assert!(approx_eq(t.at(1, 3), -2.0));
        assert!(approx_eq(t.at(2, 3), 7.0));
        assert!(approx_eq(t.at(3, 3), 1.0));
    }

    #[test]
    fn test_set_scale_fills_diagonal() {
        let mut scene = Scene::new();
        let id = node(&mut scene, "scaled");
        scene
            .node_mut(id)
            .unwrap()
            .set_scale(Vector3::new(2.0, 3.0, 4.0));

        let t = scene.local_transform(id).unwrap();
        assert!(approx_eq(t.at(0, 0), 2.0));
        assert!(approx_eq(t.at(1, 1), 3.0));
        assert!(approx_eq(t.at(2, 2), 4.0));
        assert!(approx_eq(t.at(0, 1), 0.0));
        assert!(approx_eq(t.at(1, 0), 0.0));
    }

    #[test]
    fn test_local_transform_matches_composed_matrix() {
        let mut scene = Scene::new();
        let id = node(&mut scene, "composed");
        let euler = Vector3::new(0.3, -0.7, 1.0);
        scene
            .node_mut(id)
            .unwrap()
            .set_position(Vector3::new(1.0, 2.0, 3.0))
            .set_scale(Vector3::new(2.0, 3.0, 4.0))
            .set_rotation_euler(euler);

        let rotation = Transform::from_axis_angle(Vector3::Z, euler.z)
            * Transform::from_axis_angle(Vector3::Y, euler.y)
            * Transform::from_axis_angle(Vector3::X, euler.x);
        let expected = Transform::from_translation(Vector3::new(1.0, 2.0, 3.0))
            * rotation
            * Transform::from_scale(Vector3::new(2.0, 3.0, 4.0));

        let actual = scene.global_transform(id).unwrap();
        for col in 0..4 {
            for row in 0..4 {
                assert!(
                    (actual.at(row, col) - expected.at(row, col)).abs() < 1e-5,
                    "column {col}, row {row}: {} vs {}",
                    actual.at(row, col),
                    expected.at(row, col)
                );
            }
        }
    }

    #[test]
    fn test_update_integrates_velocity() {
        let mut scene = Scene::new();
        let id = scene
            .create_node(
                NodeDesc::new("drifter")
                    .with_position(Vector3::new(1.0, 0.0, 0.0))
                    .with_velocity(Vector3::new(2.0, -4.0, 0.5)),
            )
            .unwrap();

        scene.update(0.5);

        let position = scene.node(id).unwrap().position();
        assert!(position.abs_diff_eq(Vector3::new(2.0, -2.0, 0.25), EPSILON));
        let t = scene.global_transform(id).unwrap();
        assert!(t.translation().abs_diff_eq(position, EPSILON));
    }

    #[test]
    fn test_child_global_follows_parent_move() {
        let mut scene = Scene::new();
        let parent = node(&mut scene, "parent");
        let child = scene
            .create_child(
                NodeDesc::new("child").with_position(Vector3::new(0.0, 1.0, 0.0)),
                parent,
            )
            .unwrap();
        let grandchild = scene
            .create_child(
                NodeDesc::new("grandchild").with_position(Vector3::new(0.0, 0.0, 1.0)),
                child,
            )
            .unwrap();

        // Prime every cache.
        scene.global_transform(grandchild).unwrap();
        assert!(!scene.node(child).unwrap().is_global_dirty());

        scene
            .node_mut(parent)
            .unwrap()
            .set_position(Vector3::new(10.0, 0.0, 0.0));
        assert!(scene.node(parent).unwrap().is_local_dirty());
        assert!(scene.node(child).unwrap().is_global_dirty());
        assert!(scene.node(grandchild).unwrap().is_global_dirty());
        assert!(!scene.node(child).unwrap().is_local_dirty());

        let world = scene.global_transform(grandchild).unwrap().translation();
        assert!(world.abs_diff_eq(Vector3::new(10.0, 1.0, 1.0), EPSILON));
    }

    #[test]
    fn test_parent_rotation_and_scale_apply_to_child() {
        let mut scene = Scene::new();
        let parent = scene
            .create_node(
                NodeDesc::new("parent")
                    .with_rotation(Quaternion::from_axis_angle(
                        Vector3::Y,
                        std::f64::consts::FRAC_PI_2,
                    ))
                    .with_scale(Vector3::splat(2.0)),
            )
            .unwrap();
        let child = scene
            .create_child(
                NodeDesc::new("child").with_position(Vector3::new(1.0, 0.0, 0.0)),
                parent,
            )
            .unwrap();

        let world = scene.global_transform(child).unwrap().translation();
        assert!(world.abs_diff_eq(Vector3::new(0.0, 0.0, -2.0), 1e-9));
    }

    #[test]
    fn test_rotate_applies_delta_in_parent_space() {
        let mut scene = Scene::new();
        let id = node(&mut scene, "spinner");
        let pitch = Quaternion::from_axis_angle(Vector3::X, 0.5);
        let yaw = Quaternion::from_axis_angle(Vector3::Y, 0.8);

        let mut handle = scene.node_mut(id).unwrap();
        handle.set_rotation(pitch).rotate(yaw);

        let expected = (yaw * pitch).normalized();
        assert!(handle.rotation().abs_diff_eq(expected, EPSILON));
        assert!(handle.rotation().is_normalized());
    }

    #[test]
    fn test_euler_degree_setter() {
        let mut scene = Scene::new();
        let id = node(&mut scene, "turned");
        scene
            .node_mut(id)
            .unwrap()
            .set_rotation_euler_deg(Vector3::new(0.0, 90.0, 0.0));

        let forward = scene.global_transform(id).unwrap().forward();
        assert!(forward.abs_diff_eq(Vector3::new(-1.0, 0.0, 0.0), 1e-9));
    }

    #[test]
    fn test_hierarchy_rejections() {
        let mut scene = Scene::new();
        let a = node(&mut scene, "a");
        let b = node(&mut scene, "b");
        let c = node(&mut scene, "c");
        let ghost = NodeId::new(999);

        assert_eq!(scene.add_child(a, a), Err(SceneError::SelfParenting(a)));
        assert_eq!(scene.add_child(a, ghost), Err(SceneError::NodeNotFound(ghost)));
        assert_eq!(scene.add_child(ghost, a), Err(SceneError::NodeNotFound(ghost)));

        scene.add_child(a, b).unwrap();
        assert_eq!(
            scene.add_child(c, b),
            Err(SceneError::AlreadyParented { child: b, parent: a })
        );
        assert_eq!(
            scene.add_child(b, a),
            Err(SceneError::WouldCycle { parent: b, child: a })
        );
        assert_eq!(
            scene.remove_child(a, c),
            Err(SceneError::NotAChild { parent: a, child: c })
        );

        // Nothing changed.
        assert_eq!(scene.children(a), vec![b]);
        assert_eq!(scene.parent(b), Some(a));
        assert_eq!(scene.parent(c), None);
        assert!(!scene.node(c).unwrap().is_pending_deletion());
    }

    #[test]
    fn test_detach() {
        let mut scene = Scene::new();
        let parent = node(&mut scene, "parent");
        let child = node(&mut scene, "child");
        scene
            .node_mut(parent)
            .unwrap()
            .set_position(Vector3::new(5.0, 0.0, 0.0));
        scene.add_child(parent, child).unwrap();
        assert!(approx_eq(
            scene.global_transform(child).unwrap().at(0, 3),
            5.0
        ));

        assert!(!scene.detach_child(child, parent));
        assert!(scene.detach_child(parent, child));
        assert!(!scene.detach_child(parent, child));
        assert_eq!(scene.parent(child), None);
        assert!(approx_eq(
            scene.global_transform(child).unwrap().at(0, 3),
            0.0
        ));

        assert!(!scene.detach_from_parent(child));
        scene.add_child(parent, child).unwrap();
        assert!(scene.detach_from_parent(child));
        assert!(scene.children(parent).is_empty());
    }

    #[test]
    fn test_remove_child_cascades_without_removing() {
        let mut scene = Scene::new();
        let root = node(&mut scene, "root");
        let x = scene.create_child(NodeDesc::new("x"), root).unwrap();
        let y = scene.create_child(NodeDesc::new("y"), x).unwrap();
        let z = scene.create_child(NodeDesc::new("z"), y).unwrap();

        scene.remove_child(root, x).unwrap();

        assert_eq!(scene.len(), 4);
        for id in [x, y, z] {
            assert!(scene.node(id).unwrap().is_pending_deletion());
        }
        assert!(!scene.node(root).unwrap().is_pending_deletion());
        assert!(scene.node(root).unwrap().has_child(x));
        assert_eq!(
            scene.create_child(NodeDesc::new("late"), y),
            Err(SceneError::PendingDeletion(y))
        );

        assert_eq!(scene.purge_deleted(), 3);
        assert_eq!(scene.len(), 1);
        assert!(scene.children(root).is_empty());
        assert_eq!(scene.purge_deleted(), 0);
    }

    #[test]
    fn test_update_sweeps_before_running_controllers() {
        let mut scene = Scene::new();
        let root = node(&mut scene, "root");
        let doomed = scene
            .create_child(
                NodeDesc::new("doomed").with_velocity(Vector3::new(1.0, 0.0, 0.0)),
                root,
            )
            .unwrap();
        scene.remove_child(root, doomed).unwrap();

        scene.update(1.0);
        assert!(!scene.contains(doomed));
        assert_eq!(scene.roots().collect::<Vec<_>>(), vec![root]);
    }

    #[test]
    fn test_second_camera_is_rejected_until_swept() {
        let mut scene = Scene::new();
        let first = scene
            .create_node(NodeDesc::new("cam").with_camera(Camera::default()))
            .unwrap();
        assert_eq!(scene.camera(), Some(first));

        let second = scene.create_node(NodeDesc::new("cam2").with_camera(Camera::default()));
        assert_eq!(second, Err(SceneError::CameraAlreadyRegistered(first)));
        assert_eq!(scene.len(), 1);

        scene.remove_node(first).unwrap();
        scene.purge_deleted();
        assert_eq!(scene.camera(), None);
        assert!(
            scene
                .create_node(NodeDesc::new("cam3").with_camera(Camera::default()))
                .is_ok()
        );
    }

    #[test]
    fn test_render_requires_camera() {
        let mut scene = Scene::new();
        scene
            .create_node(NodeDesc::new("mesh").with_renderable(renderable()))
            .unwrap();

        let mut sink = RecordingSink::default();
        assert_eq!(scene.render(&mut sink), Err(SceneError::NoCamera));
        assert_eq!(sink.frames, 0);
    }

    #[test]
    fn test_render_dispatches_each_renderable() {
        let mut scene = Scene::new();
        let camera = scene
            .create_node(
                NodeDesc::new("camera")
                    .with_position(Vector3::new(0.0, 0.0, 10.0))
                    .with_camera(Camera::default()),
            )
            .unwrap();
        let a = scene
            .create_node(NodeDesc::new("a").with_renderable(renderable()))
            .unwrap();
        let b = scene
            .create_child(
                NodeDesc::new("b")
                    .with_position(Vector3::new(0.0, 2.0, 0.0))
                    .with_renderable(renderable()),
                a,
            )
            .unwrap();
        let lamp = scene
            .create_node(
                NodeDesc::new("lamp")
                    .with_position(Vector3::new(0.0, 5.0, 0.0))
                    .with_light(Light::new(Vector3::new(1.0, 0.5, 0.25), 0.3)),
            )
            .unwrap();
        node(&mut scene, "empty");

        let mut sink = RecordingSink::default();
        assert_eq!(scene.render(&mut sink), Ok(2));

        assert_eq!(sink.frames, 1);
        let view = sink.camera.unwrap();
        assert_eq!(view.node, camera);
        assert!(view.position.abs_diff_eq(Vector3::new(0.0, 0.0, 10.0), EPSILON));

        assert_eq!(sink.lights.len(), 1);
        assert_eq!(sink.lights[0].node, lamp);
        assert!(sink.lights[0].position.abs_diff_eq(Vector3::new(0.0, 5.0, 0.0), EPSILON));
        assert!(approx_eq(sink.lights[0].strength, 0.3));

        let ids: Vec<NodeId> = sink.draws.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![a, b]);
        assert!(approx_eq(sink.draws[1].1.at(1, 3), 2.0));
    }

    #[test]
    fn test_render_skips_pending_nodes() {
        let mut scene = Scene::new();
        scene
            .create_node(NodeDesc::new("camera").with_camera(Camera::default()))
            .unwrap();
        let mesh = scene
            .create_node(NodeDesc::new("mesh").with_renderable(renderable()))
            .unwrap();
        scene.remove_node(mesh).unwrap();

        let mut sink = RecordingSink::default();
        assert_eq!(scene.render(&mut sink), Ok(0));
    }

    #[test]
    fn test_controller_sees_frame_input() {
        let mut scene = Scene::new();
        let id = scene
            .create_node(NodeDesc::new("puppet").with_controller(
                |node: &mut NodeMut<'_>, dt: f64| {
                    let movement = node.input().movement;
                    let position = node.position() + movement * dt;
                    node.set_position(position);
                },
            ))
            .unwrap();

        scene.set_input(FrameInput::new(Vector3::new(0.0, 4.0, 0.0), Vector2::ZERO));
        scene.update(0.25);
        scene.update(0.25);

        let position = scene.node(id).unwrap().position();
        assert!(position.abs_diff_eq(Vector3::new(0.0, 2.0, 0.0), EPSILON));
        assert!(scene.node(id).unwrap().has_controller());
    }

    #[test]
    fn test_controller_can_replace_itself() {
        let mut scene = Scene::new();
        let id = scene
            .create_node(NodeDesc::new("shifter").with_controller(
                |node: &mut NodeMut<'_>, _dt: f64| {
                    node.set_controller(|node: &mut NodeMut<'_>, _dt: f64| {
                        node.set_scale(Vector3::splat(3.0));
                    });
                },
            ))
            .unwrap();

        scene.update(0.1);
        assert_eq!(scene.node(id).unwrap().scale(), Vector3::ONE);
        scene.update(0.1);
        assert_eq!(scene.node(id).unwrap().scale(), Vector3::splat(3.0));
    }

    #[test]
    fn test_descendants_and_find() {
        let mut scene = Scene::new();
        let root = node(&mut scene, "root");
        let a = scene.create_child(NodeDesc::new("a"), root).unwrap();
        let a1 = scene.create_child(NodeDesc::new("a1"), a).unwrap();
        let b = scene.create_child(NodeDesc::new("b"), root).unwrap();

        assert_eq!(scene.descendants(root), vec![a, a1, b]);
        assert_eq!(scene.find_by_name("a1"), Some(a1));
        assert_eq!(scene.find_by_name("nope"), None);
    }

    #[test]
    fn test_set_aspect_reaches_camera() {
        let mut scene = Scene::new();
        let camera = scene
            .create_node(NodeDesc::new("camera").with_camera(Camera::perspective(
                90.0, 1.0, 0.1, 100.0,
            )))
            .unwrap();
        scene.set_aspect(2.0);

        let camera = scene.node(camera).unwrap().camera().unwrap();
        assert!(approx_eq(camera.aspect(), 2.0));
        assert!(approx_eq(camera.projection().at(0, 0), 0.5));
    }
}
