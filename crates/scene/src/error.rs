//! Error types for scene-graph operations.

use thiserror::Error;

use crate::node::NodeId;

/// Error type for hierarchy and registry operations.
///
/// Every operation that returns one of these leaves the scene untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("{0} cannot be its own child")]
    SelfParenting(NodeId),

    #[error("{child} already has parent {parent}; detach it first")]
    AlreadyParented { child: NodeId, parent: NodeId },

    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Attaching `child` under `parent` would close a loop in the hierarchy.
    #[error("attaching {child} under {parent} would create a cycle")]
    WouldCycle { parent: NodeId, child: NodeId },

    #[error("{0} not found")]
    NodeNotFound(NodeId),

    #[error("a camera is already registered as {0}")]
    CameraAlreadyRegistered(NodeId),

    #[error("scene has no camera")]
    NoCamera,

    #[error("{0} is pending deletion")]
    PendingDeletion(NodeId),
}

/// Result type alias for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
