//! Scene hierarchy and component lifecycle
//!
//! - [`SceneGraph`]: arena of transform nodes (ownership, parenting, world matrices)
//! - [`Scene`]: the graph plus the collider registry, driving attach, update
//!   and the deferred destroy sweep
//! - [`SceneLoader`]: builds a scene from line-oriented text
//!
//! ## Frame order
//!
//! ```text
//! Scene::update            every component, pre-order, attachment order
//! Scene::destroy_pending   pending subtrees removed, on_detach called
//! Scene::recompute_transforms
//! ```

mod node;
mod runtime;
mod scene_graph;
pub mod scene_loader;

pub use node::{Node, NodeId};
pub use runtime::Scene;
pub use scene_graph::SceneGraph;
pub use scene_loader::SceneLoader;

use thiserror::Error;

/// Structural errors in the scene hierarchy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The node is not (or no longer) in the graph
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// Parenting would make a node its own ancestor
    #[error("making {child:?} a child of {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Requested parent
        parent: NodeId,
        /// Requested child
        child: NodeId,
    },
}
