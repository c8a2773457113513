//! Reusable node subtrees.

use crate::error::SceneResult;
use crate::node::NodeId;
use crate::scene::Scene;

/// Builds a subtree of nodes in a scene.
///
/// Returns the id of the subtree's root, which is attached under `parent` when
/// one is given.
pub trait Prefab {
    fn instantiate(&self, scene: &mut Scene, parent: Option<NodeId>) -> SceneResult<NodeId>;
}
