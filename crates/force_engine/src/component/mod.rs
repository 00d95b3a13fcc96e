//! Behavior modules attached to scene nodes
//!
//! A [`Component`] is owned by exactly one node and receives lifecycle calls
//! from the [`Scene`](crate::scene::Scene):
//!
//! - `on_attach` right after it is appended to its node's component list
//! - `on_update` once per frame, in attachment order
//! - `on_detach` once, when its node is swept after a destroy request
//!
//! Every callback gets a [`ComponentContext`] giving access to the graph, the
//! collider registry, the input source and the other components on the owner.

pub mod registry;
pub mod tokens;

pub use registry::{ComponentFactory, ComponentRegistry, RegistryError};
pub use tokens::{TokenError, TokenStream};

use crate::foundation::math::{Transform, Vec3};
use crate::input::InputSource;
use crate::physics::ColliderRegistry;
use crate::scene::{NodeId, SceneGraph};
use std::any::Any;
use thiserror::Error;

/// Errors raised while constructing a component from text
#[derive(Error, Debug)]
pub enum ComponentError {
    /// A field was missing or malformed
    #[error(transparent)]
    Tokens(#[from] TokenError),

    /// The fields parsed but describe an unusable component
    #[error("invalid component: {0}")]
    Invalid(String),
}

/// Polymorphic behavior attached to a scene node
pub trait Component: Any {
    /// Registry key of this component type
    fn type_name(&self) -> &'static str;

    /// Called once, right after the component joins its owner
    fn on_attach(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Called once per frame with the frame's delta time in seconds
    fn on_update(&mut self, _ctx: &mut ComponentContext<'_>, _delta_time: f32) {}

    /// Called once when the owning node is removed from the graph
    fn on_detach(&mut self, _ctx: &mut DetachContext<'_>) {}

    /// Upcast for type-based lookup
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for type-based lookup
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Access handed to a component during attach and update
///
/// The owner's component list is split around the running component, so
/// `sibling` lookups see every other component on the owner while
/// `graph.component(owner)` does not.
pub struct ComponentContext<'a> {
    /// Scene hierarchy
    pub graph: &'a mut SceneGraph,
    /// Live colliders
    pub colliders: &'a mut ColliderRegistry,
    input: &'a dyn InputSource,
    owner: NodeId,
    before: &'a mut [Box<dyn Component>],
    after: &'a mut [Box<dyn Component>],
    deferred: &'a mut Vec<(NodeId, Box<dyn Component>)>,
    quit: &'a mut bool,
}

impl<'a> ComponentContext<'a> {
    pub(crate) fn new(
        graph: &'a mut SceneGraph,
        colliders: &'a mut ColliderRegistry,
        input: &'a dyn InputSource,
        owner: NodeId,
        before: &'a mut [Box<dyn Component>],
        after: &'a mut [Box<dyn Component>],
        deferred: &'a mut Vec<(NodeId, Box<dyn Component>)>,
        quit: &'a mut bool,
    ) -> Self {
        Self {
            graph,
            colliders,
            input,
            owner,
            before,
            after,
            deferred,
            quit,
        }
    }

    /// Node the running component is attached to
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    /// Keyboard and cursor state
    pub fn input(&self) -> &dyn InputSource {
        self.input
    }

    /// First other component of type `T` on the owner
    pub fn sibling<T: Component>(&self) -> Option<&T> {
        self.before
            .iter()
            .chain(self.after.iter())
            .find_map(|c| c.as_any().downcast_ref::<T>())
    }

    /// First other component of type `T` on the owner, mutably
    pub fn sibling_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.before
            .iter_mut()
            .chain(self.after.iter_mut())
            .find_map(|c| c.as_any_mut().downcast_mut::<T>())
    }

    /// Owner's local transform
    pub fn transform(&self) -> Option<&Transform> {
        self.graph.transform(self.owner)
    }

    /// Owner's local transform, mutably
    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        self.graph.transform_mut(self.owner)
    }

    /// Owner's world position from the last transform pass
    pub fn world_position(&self) -> Option<Vec3> {
        self.graph.world_position(self.owner)
    }

    /// Queue `component` for attachment to `node`
    ///
    /// Attachment happens once the running pass finishes; the new component
    /// is first updated on the next frame.
    pub fn attach(&mut self, node: NodeId, component: Box<dyn Component>) {
        self.deferred.push((node, component));
    }

    /// Request destruction of the owner at the next sweep
    pub fn destroy_owner(&mut self) {
        self.graph.mark_pending_destroy(self.owner);
    }

    /// Ask the frame loop to stop after the current frame
    pub fn request_quit(&mut self) {
        *self.quit = true;
    }
}

/// Access handed to a component when its node is swept
pub struct DetachContext<'a> {
    /// Live colliders
    pub colliders: &'a mut ColliderRegistry,
    /// Node that owned the component; no longer in the graph
    pub owner: NodeId,
}
