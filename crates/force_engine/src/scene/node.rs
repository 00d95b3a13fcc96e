//! Transform node stored in the scene graph arena

use crate::component::Component;
use crate::foundation::math::{translation_of, Mat4, Transform, Vec3};
use slotmap::new_key_type;

new_key_type! {
    /// Handle to a node in a [`SceneGraph`](super::SceneGraph)
    pub struct NodeId;
}

/// A positioned point in the scene hierarchy
///
/// Children are owned through the graph arena; `parent` is a plain key used
/// for upward traversal only.
pub struct Node {
    name: Option<String>,

    /// Local position, rotation (degrees) and scale
    pub transform: Transform,

    local: Mat4,
    world: Mat4,
    world_valid: bool,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) components: Vec<Box<dyn Component>>,
    pub(crate) pending_destroy: bool,
}

impl Node {
    pub(crate) fn new(name: Option<String>) -> Self {
        Self {
            name,
            transform: Transform::default(),
            local: Mat4::identity(),
            world: Mat4::identity(),
            world_valid: false,
            parent: None,
            children: Vec::new(),
            components: Vec::new(),
            pending_destroy: false,
        }
    }

    /// Optional lookup name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Parent node, `None` for roots
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in attachment order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Attached components in attachment order
    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }

    /// Whether a destroy was requested for this node
    pub fn is_pending_destroy(&self) -> bool {
        self.pending_destroy
    }

    /// Local matrix from the last transform pass
    pub fn local_matrix(&self) -> &Mat4 {
        &self.local
    }

    /// World matrix from the last transform pass, `None` if never computed
    pub fn world_matrix(&self) -> Option<&Mat4> {
        self.world_valid.then_some(&self.world)
    }

    /// World matrix, or identity if the node has not been visited yet
    pub fn world_matrix_or_identity(&self) -> Mat4 {
        if self.world_valid {
            self.world
        } else {
            log::trace!("World matrix read before first transform pass");
            Mat4::identity()
        }
    }

    /// World-space position, `None` if the world matrix was never computed
    pub fn world_position(&self) -> Option<Vec3> {
        self.world_matrix().map(translation_of)
    }

    /// First attached component of type `T`
    pub fn component<T: Component>(&self) -> Option<&T> {
        self.components.iter().find_map(|c| c.as_any().downcast_ref::<T>())
    }

    /// First attached component of type `T`, mutably
    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find_map(|c| c.as_any_mut().downcast_mut::<T>())
    }

    pub(crate) fn set_matrices(&mut self, local: Mat4, world: Mat4) {
        self.local = local;
        self.world = world;
        self.world_valid = true;
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field(
                "components",
                &self.components.iter().map(|c| c.type_name()).collect::<Vec<_>>(),
            )
            .field("pending_destroy", &self.pending_destroy)
            .finish_non_exhaustive()
    }
}
