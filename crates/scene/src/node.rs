//! Scene nodes: kinematic state, cached transforms and role payloads.
//!
//! A [`Node`] is owned by its [`Scene`](crate::Scene) and only ever referred to
//! by [`NodeId`]. Reading a node is done through `&Node`; everything that can
//! change a transform goes through [`NodeMut`](crate::NodeMut) so the scene can
//! propagate dirtiness to descendants.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::fmt;

use bitflags::bitflags;
use orrery_math::{Quaternion, Transform, Vector3};

use crate::camera::Camera;
use crate::controller::Controller;
use crate::light::Light;
use crate::render::Renderable;

/// Identifier of a node within one scene.
///
/// Ids are assigned in creation order and never reused by the same scene, so
/// ordering by id is ordering by creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

bitflags! {
    /// Roles a node plays in the scene.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeProperties: u32 {
        /// Has a [`Renderable`] payload and is drawn every frame.
        const RENDERABLE = 1 << 0;
        /// Has a [`Camera`] payload.
        const CAMERA = 1 << 1;
        /// Has a [`Light`] payload.
        const AREA_LIGHT = 1 << 2;
    }
}

/// Everything needed to create a node.
///
/// # Example
///
/// ```
/// use orrery_math::Vector3;
/// use orrery_scene::{Light, NodeDesc, NodeProperties, Scene};
///
/// let mut scene = Scene::new();
/// let lamp = scene
///     .create_node(
///         NodeDesc::new("lamp")
///             .with_position(Vector3::new(0.0, 10.0, 0.0))
///             .with_light(Light::new(Vector3::ONE, 0.2)),
///     )
///     .unwrap();
///
/// let node = scene.node(lamp).unwrap();
/// assert!(node.has_property(NodeProperties::AREA_LIGHT));
/// assert_eq!(node.position(), Vector3::new(0.0, 10.0, 0.0));
/// ```
pub struct NodeDesc {
    pub(crate) name: String,
    pub(crate) position: Vector3,
    pub(crate) rotation: Quaternion,
    pub(crate) scale: Vector3,
    pub(crate) velocity: Vector3,
    pub(crate) camera: Option<Camera>,
    pub(crate) light: Option<Light>,
    pub(crate) renderable: Option<Renderable>,
    pub(crate) controller: Option<Box<dyn Controller>>,
}

impl Default for NodeDesc {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: Vector3::ZERO,
            rotation: Quaternion::IDENTITY,
            scale: Vector3::ONE,
            velocity: Vector3::ZERO,
            camera: None,
            light: None,
            renderable: None,
            controller: None,
        }
    }
}

impl NodeDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quaternion) -> Self {
        self.rotation = rotation.normalized();
        self
    }

    /// Rotation from `(pitch, yaw, roll)` in radians.
    pub fn with_rotation_euler(self, euler: Vector3) -> Self {
        self.with_rotation(Quaternion::from_euler(euler))
    }

    pub fn with_scale(mut self, scale: Vector3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.light = Some(light);
        self
    }

    pub fn with_renderable(mut self, renderable: Renderable) -> Self {
        self.renderable = Some(renderable);
        self
    }

    pub fn with_controller(mut self, controller: impl Controller + 'static) -> Self {
        self.controller = Some(Box::new(controller));
        self
    }

    pub(crate) fn properties(&self) -> NodeProperties {
        let mut properties = NodeProperties::empty();
        properties.set(NodeProperties::RENDERABLE, self.renderable.is_some());
        properties.set(NodeProperties::CAMERA, self.camera.is_some());
        properties.set(NodeProperties::AREA_LIGHT, self.light.is_some());
        properties
    }
}

/// A node in the scene graph.
///
/// The local and global matrices are caches. The local matrix is rebuilt from
/// position, rotation and scale when the local flag is set; the global matrix
/// is rebuilt from the parent's global matrix when the global flag is set.
/// Setting the local flag always sets the global flag of the node and of every
/// descendant.
pub struct Node {
    id: NodeId,
    name: String,

    pub(crate) position: Vector3,
    pub(crate) rotation: Quaternion,
    pub(crate) scale: Vector3,
    pub(crate) velocity: Vector3,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: BTreeSet<NodeId>,
    pub(crate) pending_deletion: bool,

    properties: NodeProperties,
    pub(crate) camera: Option<Camera>,
    pub(crate) light: Option<Light>,
    renderable: Option<Renderable>,
    pub(crate) controller: Option<Box<dyn Controller>>,

    local: Cell<Transform>,
    pub(crate) global: Cell<Transform>,
    pub(crate) local_dirty: Cell<bool>,
    pub(crate) global_dirty: Cell<bool>,
}

impl Node {
    pub(crate) fn new(id: NodeId, desc: NodeDesc) -> Self {
        let properties = desc.properties();
        let local = compose_local(desc.position, desc.rotation, desc.scale);
        Self {
            id,
            name: desc.name,
            position: desc.position,
            rotation: desc.rotation,
            scale: desc.scale,
            velocity: desc.velocity,
            parent: None,
            children: BTreeSet::new(),
            pending_deletion: false,
            properties,
            camera: desc.camera,
            light: desc.light,
            renderable: desc.renderable,
            controller: desc.controller,
            local: Cell::new(local),
            global: Cell::new(local),
            local_dirty: Cell::new(false),
            global_dirty: Cell::new(true),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    pub fn scale(&self) -> Vector3 {
        self.scale
    }

    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in creation order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().copied()
    }

    pub fn has_child(&self, id: NodeId) -> bool {
        self.children.contains(&id)
    }

    pub fn properties(&self) -> NodeProperties {
        self.properties
    }

    pub fn has_property(&self, property: NodeProperties) -> bool {
        self.properties.contains(property)
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn light(&self) -> Option<&Light> {
        self.light.as_ref()
    }

    pub fn renderable(&self) -> Option<&Renderable> {
        self.renderable.as_ref()
    }

    pub fn has_controller(&self) -> bool {
        self.controller.is_some()
    }

    pub fn is_pending_deletion(&self) -> bool {
        self.pending_deletion
    }

    pub fn is_local_dirty(&self) -> bool {
        self.local_dirty.get()
    }

    pub fn is_global_dirty(&self) -> bool {
        self.global_dirty.get()
    }

    /// `translate(position) * rotation * scale`, recomputed only when dirty.
    pub fn local_transform(&self) -> Transform {
        if self.local_dirty.get() {
            self.local
                .set(compose_local(self.position, self.rotation, self.scale));
            self.local_dirty.set(false);
        }
        self.local.get()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("scale", &self.scale)
            .field("velocity", &self.velocity)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("properties", &self.properties)
            .field("pending_deletion", &self.pending_deletion)
            .field("has_controller", &self.controller.is_some())
            .finish_non_exhaustive()
    }
}

fn compose_local(position: Vector3, rotation: Quaternion, scale: Vector3) -> Transform {
    let mut local = Transform::from_translation(position);
    local *= rotation.to_transform();
    local.scale(scale);
    local
}
