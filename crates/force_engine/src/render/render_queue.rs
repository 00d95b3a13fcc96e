//! Per-frame draw command list
//!
//! Filled by the submit pass and consumed by the execute pass. The queue is
//! cleared at the start of every frame so nothing leaks between frames.

use super::{Material, Mesh};
use crate::foundation::math::Mat4;
use crate::scene::NodeId;
use std::sync::Arc;

/// One mesh draw with its resolved material and world transform
#[derive(Debug, Clone)]
pub struct DrawCommand {
    /// Node that produced the command
    pub node: NodeId,
    /// Geometry to draw
    pub mesh: Arc<Mesh>,
    /// Resolved material (component override first, then the model's own)
    pub material: Arc<Material>,
    /// World transform of the node
    pub model_matrix: Mat4,
}

/// Ordered draw commands for the current frame
#[derive(Debug, Default)]
pub struct RenderQueue {
    commands: Vec<DrawCommand>,
}

impl RenderQueue {
    /// Create an empty render queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every command
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Append a command
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Commands in submission order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
