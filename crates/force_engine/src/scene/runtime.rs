//! Component lifecycle over the scene graph

use super::{NodeId, SceneError, SceneGraph};
use crate::component::{Component, ComponentContext, DetachContext};
use crate::input::InputSource;
use crate::physics::ColliderRegistry;

/// Scene graph, collider registry and pending attachments
#[derive(Default)]
pub struct Scene {
    /// Node hierarchy
    pub graph: SceneGraph,

    /// Every live collider; mutated only by collider attach and detach
    pub colliders: ColliderRegistry,

    /// Components queued by running callbacks
    deferred: Vec<(NodeId, Box<dyn Component>)>,

    quit_requested: bool,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `component` to `node` and run its attach hook
    ///
    /// The component is already in the owner's list when `on_attach` runs,
    /// so it sees every earlier sibling. Components queued by the hook are
    /// attached before this returns.
    pub fn attach(
        &mut self,
        node: NodeId,
        component: Box<dyn Component>,
        input: &dyn InputSource,
    ) -> Result<(), SceneError> {
        self.attach_now(node, component, input)?;
        self.flush_deferred(input);
        Ok(())
    }

    fn attach_now(
        &mut self,
        node: NodeId,
        component: Box<dyn Component>,
        input: &dyn InputSource,
    ) -> Result<(), SceneError> {
        if !self.graph.contains(node) {
            return Err(SceneError::UnknownNode(node));
        }
        log::trace!("Attaching {} to {:?}", component.type_name(), node);

        let mut components = self.graph.take_components(node);
        components.push(component);
        if let Some((current, before)) = components.split_last_mut() {
            let mut none: [Box<dyn Component>; 0] = [];
            let mut ctx = ComponentContext::new(
                &mut self.graph,
                &mut self.colliders,
                input,
                node,
                before,
                &mut none,
                &mut self.deferred,
                &mut self.quit_requested,
            );
            current.on_attach(&mut ctx);
        }
        self.graph.restore_components(node, components);
        Ok(())
    }

    /// Run `on_update` on every component of every live node
    ///
    /// Nodes are visited in pre-order, components in attachment order. Nodes
    /// pending destroy (or under a pending ancestor) are skipped, and a node
    /// that becomes pending stops updating its remaining components.
    /// Returns the number of `on_update` calls made.
    pub fn update(&mut self, delta_time: f32, input: &dyn InputSource) -> usize {
        let mut updated = 0;

        for id in self.graph.pre_order() {
            if self.graph.is_destroy_requested(id) {
                continue;
            }

            let mut components = self.graph.take_components(id);
            for index in 0..components.len() {
                if self.graph.is_destroy_requested(id) {
                    break;
                }
                let (before, rest) = components.split_at_mut(index);
                let Some((current, after)) = rest.split_first_mut() else {
                    break;
                };
                let mut ctx = ComponentContext::new(
                    &mut self.graph,
                    &mut self.colliders,
                    input,
                    id,
                    before,
                    after,
                    &mut self.deferred,
                    &mut self.quit_requested,
                );
                current.on_update(&mut ctx, delta_time);
                updated += 1;
            }
            self.graph.restore_components(id, components);
        }

        self.flush_deferred(input);
        updated
    }

    /// Remove every pending subtree, calling `on_detach` on its components
    ///
    /// Returns the number of nodes removed.
    pub fn destroy_pending(&mut self) -> usize {
        let mut removed = 0;

        for root in self.graph.pending_roots() {
            for (id, mut node) in self.graph.remove_subtree(root) {
                let mut ctx = DetachContext {
                    colliders: &mut self.colliders,
                    owner: id,
                };
                for component in node.components.iter_mut() {
                    component.on_detach(&mut ctx);
                }
                removed += 1;
            }
        }

        if removed > 0 {
            log::debug!("Destroyed {} nodes", removed);
        }
        removed
    }

    /// Rebuild every node's local and world matrix
    pub fn recompute_transforms(&mut self) {
        self.graph.recompute_transforms();
    }

    /// Whether a component asked the frame loop to stop
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Clear a quit request
    pub fn clear_quit_request(&mut self) {
        self.quit_requested = false;
    }

    /// Components waiting to be attached
    pub fn pending_attachments(&self) -> usize {
        self.deferred.len()
    }

    fn flush_deferred(&mut self, input: &dyn InputSource) {
        while !self.deferred.is_empty() {
            for (node, component) in std::mem::take(&mut self.deferred) {
                let type_name = component.type_name();
                if let Err(e) = self.attach_now(node, component, input) {
                    log::warn!("Dropped deferred {}: {}", type_name, e);
                }
            }
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("nodes", &self.graph.len())
            .field("colliders", &self.colliders.len())
            .field("deferred", &self.deferred.len())
            .finish()
    }
}
