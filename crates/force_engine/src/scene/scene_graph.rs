//! Arena-backed transform hierarchy
//!
//! Nodes live in a [`SlotMap`] keyed by [`NodeId`]. Parent→child edges are
//! the `children` lists; the `parent` field is a back-reference only. Nodes
//! without a parent are kept in `roots`, in creation order.

use super::node::{Node, NodeId};
use super::SceneError;
use crate::component::Component;
use crate::foundation::math::{translation_of, Mat4, Transform, Vec3};
use slotmap::SlotMap;

/// Forest of transform nodes
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new root node
    pub fn create_node(&mut self, name: Option<&str>) -> NodeId {
        let id = self.nodes.insert(Node::new(name.map(str::to_owned)));
        self.roots.push(id);
        log::trace!("Created node {:?} ({:?})", id, name);
        id
    }

    /// Create a node with a local transform, optionally under `parent`
    pub fn spawn(
        &mut self,
        name: Option<&str>,
        transform: Transform,
        parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        let id = self.create_node(name);
        self.nodes[id].transform = transform;
        if let Some(parent) = parent {
            if let Err(e) = self.add_child(parent, id) {
                self.remove_subtree(id);
                return Err(e);
            }
        }
        Ok(id)
    }

    /// Number of live nodes, including those pending destroy
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Borrow a node
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Borrow a node mutably
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Root nodes in creation order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Children of `id`; empty for unknown nodes
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Parent of `id`
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Local transform of `id`
    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.nodes.get(id).map(|n| &n.transform)
    }

    /// Local transform of `id`, mutably
    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(id).map(|n| &mut n.transform)
    }

    /// World position from the last transform pass
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.nodes.get(id).and_then(Node::world_position)
    }

    /// World matrix built from the current local transforms of `id` and its ancestors
    ///
    /// Unlike [`Node::world_matrix`], this reflects moves made since the last
    /// transform pass.
    pub fn current_world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut world = self.nodes.get(id)?.transform.to_matrix();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            let node = self.nodes.get(parent)?;
            world = node.transform.to_matrix() * world;
            current = node.parent;
        }
        Some(world)
    }

    /// World position of `id` from its current local transforms
    pub fn current_world_position(&self, id: NodeId) -> Option<Vec3> {
        self.current_world_matrix(id).as_ref().map(translation_of)
    }

    /// First component of type `T` on `id`
    pub fn component<T: Component>(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id).and_then(Node::component::<T>)
    }

    /// First component of type `T` on `id`, mutably
    pub fn component_mut<T: Component>(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id).and_then(Node::component_mut::<T>)
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Make `parent` the sole parent of `child`
    ///
    /// The child is detached from its previous parent (or the root list)
    /// first. Re-adding an existing child is a no-op.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        if !self.contains(child) {
            return Err(SceneError::UnknownNode(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::WouldCreateCycle { parent, child });
        }

        let previous = self.nodes[child].parent;
        match previous {
            Some(current) if current == parent => return Ok(()),
            Some(current) => {
                let siblings = &mut self.nodes[current].children;
                if let Some(index) = siblings.iter().position(|&id| id == child) {
                    siblings.remove(index);
                }
            }
            None => self.roots.retain(|&id| id != child),
        }

        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    /// Remove the first occurrence of `child` from `parent`'s children
    ///
    /// The detached child becomes a root. Returns `false` when `child` was not
    /// a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(node) = self.nodes.get_mut(parent) else {
            return false;
        };
        let Some(index) = node.children.iter().position(|&id| id == child) else {
            return false;
        };
        node.children.remove(index);

        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = None;
            self.roots.push(child);
        }
        true
    }

    /// Detach `id` from its parent, making it a root
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id);
        }
    }

    /// Recompute local and world matrices for every node, parents first
    pub fn recompute_transforms(&mut self) {
        for i in 0..self.roots.len() {
            let root = self.roots[i];
            self.recompute_node(root, None);
        }
    }

    fn recompute_node(&mut self, id: NodeId, parent_world: Option<&Mat4>) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let local = node.transform.to_matrix();
        let world = parent_world.map_or(local, |parent| parent * local);
        node.set_matrices(local, world);

        for i in 0..self.nodes[id].children.len() {
            let child = self.nodes[id].children[i];
            self.recompute_node(child, Some(&world));
        }
    }

    /// All node ids in pre-order: roots in order, parents before children
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Pre-order ids of the subtree rooted at `id`, including `id`
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        order
    }

    /// First node named `name` in pre-order across the forest
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.pre_order()
            .into_iter()
            .find(|&id| self.nodes[id].name() == Some(name))
    }

    /// First strict descendant of `root` named `name`
    pub fn find_descendant(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.subtree(root)
            .into_iter()
            .skip(1)
            .find(|&id| self.nodes[id].name() == Some(name))
    }

    /// Topmost ancestor of `id`
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.nodes.get(id).map(|_| id)?;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        Some(current)
    }

    /// Request removal of `id` and its subtree at the next sweep
    pub fn mark_pending_destroy(&mut self, id: NodeId) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.pending_destroy = true;
                true
            }
            None => false,
        }
    }

    /// Whether `id` or any ancestor is pending destroy
    pub fn is_destroy_requested(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.nodes.get(node_id) {
                Some(node) if node.pending_destroy => return true,
                Some(node) => current = node.parent,
                None => return true,
            }
        }
        false
    }

    /// Pending nodes whose ancestors are not pending, in pre-order
    pub(crate) fn pending_roots(&self) -> Vec<NodeId> {
        self.pre_order()
            .into_iter()
            .filter(|&id| {
                self.nodes[id].pending_destroy
                    && self.parent(id).map_or(true, |p| !self.is_destroy_requested(p))
            })
            .collect()
    }

    /// Unlink `id` from its parent and remove it with its whole subtree
    ///
    /// Returns the removed nodes in pre-order so their components can be
    /// detached.
    pub(crate) fn remove_subtree(&mut self, id: NodeId) -> Vec<(NodeId, Node)> {
        if !self.contains(id) {
            return Vec::new();
        }
        match self.parent(id) {
            Some(parent) => {
                let siblings = &mut self.nodes[parent].children;
                if let Some(index) = siblings.iter().position(|&c| c == id) {
                    siblings.remove(index);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }

        self.subtree(id)
            .into_iter()
            .filter_map(|node_id| self.nodes.remove(node_id).map(|node| (node_id, node)))
            .collect()
    }

    pub(crate) fn take_components(&mut self, id: NodeId) -> Vec<Box<dyn Component>> {
        self.nodes
            .get_mut(id)
            .map(|n| std::mem::take(&mut n.components))
            .unwrap_or_default()
    }

    /// Put components back, keeping any that were appended meanwhile after them
    pub(crate) fn restore_components(&mut self, id: NodeId, mut components: Vec<Box<dyn Component>>) {
        if let Some(node) = self.nodes.get_mut(id) {
            let appended = std::mem::take(&mut node.components);
            components.extend(appended);
            node.components = components;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn named(graph: &mut SceneGraph, name: &str) -> NodeId {
        graph.create_node(Some(name))
    }

    #[test]
    fn test_world_is_parent_world_times_local() {
        let mut graph = SceneGraph::new();
        let a = named(&mut graph, "a");
        let b = named(&mut graph, "b");
        let c = named(&mut graph, "c");
        graph.add_child(a, b).unwrap();
        graph.add_child(b, c).unwrap();

        graph.transform_mut(a).unwrap().position = Vec3::new(1.0, 0.0, 0.0);
        graph.transform_mut(a).unwrap().rotation = Vec3::new(0.0, 0.0, 90.0);
        graph.transform_mut(b).unwrap().position = Vec3::new(0.0, 2.0, 0.0);
        graph.transform_mut(b).unwrap().scale = Vec3::new(2.0, 2.0, 2.0);
        graph.transform_mut(c).unwrap().position = Vec3::new(1.0, 1.0, 1.0);

        graph.recompute_transforms();

        let root = graph.get(a).unwrap();
        assert_relative_eq!(*root.world_matrix().unwrap(), *root.local_matrix());

        for (parent, child) in [(a, b), (b, c)] {
            let parent_world = *graph.get(parent).unwrap().world_matrix().unwrap();
            let node = graph.get(child).unwrap();
            assert_relative_eq!(
                *node.world_matrix().unwrap(),
                parent_world * node.local_matrix(),
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn test_world_position_absent_before_first_pass() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node(None);
        assert_eq!(graph.world_position(a), None);
        graph.recompute_transforms();
        assert_eq!(graph.world_position(a), Some(Vec3::zeros()));
    }

    #[test]
    fn test_current_world_tracks_moves_between_passes() {
        let mut graph = SceneGraph::new();
        let a = named(&mut graph, "a");
        let b = named(&mut graph, "b");
        graph.add_child(a, b).unwrap();
        graph.transform_mut(b).unwrap().position = Vec3::new(0.0, 1.0, 0.0);
        graph.recompute_transforms();

        graph.transform_mut(a).unwrap().position = Vec3::new(3.0, 0.0, 0.0);
        graph.transform_mut(a).unwrap().rotation = Vec3::new(0.0, 0.0, 90.0);

        assert_eq!(graph.world_position(b), Some(Vec3::new(0.0, 1.0, 0.0)));
        assert_relative_eq!(
            graph.current_world_position(b).unwrap(),
            Vec3::new(2.0, 0.0, 0.0),
            epsilon = 1e-5
        );

        graph.recompute_transforms();
        assert_relative_eq!(
            graph.current_world_matrix(b).unwrap(),
            *graph.get(b).unwrap().world_matrix().unwrap(),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_reparent_moves_between_exactly_one_list() {
        let mut graph = SceneGraph::new();
        let first = named(&mut graph, "first");
        let second = named(&mut graph, "second");
        let child = named(&mut graph, "child");
        graph.add_child(first, child).unwrap();
        let count = graph.len();

        graph.add_child(second, child).unwrap();

        assert!(graph.children(first).is_empty());
        assert_eq!(graph.children(second), &[child]);
        assert_eq!(graph.parent(child), Some(second));
        assert_eq!(graph.len(), count);
        assert_eq!(graph.roots(), &[first, second]);
    }

    #[test]
    fn test_add_child_is_idempotent() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node(None);
        let child = graph.create_node(None);
        graph.add_child(parent, child).unwrap();
        graph.add_child(parent, child).unwrap();
        assert_eq!(graph.children(parent), &[child]);
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node(None);
        let b = graph.create_node(None);
        graph.add_child(a, b).unwrap();

        assert!(matches!(graph.add_child(b, a), Err(SceneError::WouldCreateCycle { .. })));
        assert!(matches!(graph.add_child(a, a), Err(SceneError::WouldCreateCycle { .. })));
        assert_eq!(graph.parent(b), Some(a));
        assert_eq!(graph.roots(), &[a]);
    }

    #[test]
    fn test_remove_child_makes_root_and_ignores_strangers() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node(None);
        let child = graph.create_node(None);
        let stranger = graph.create_node(None);
        graph.add_child(parent, child).unwrap();

        assert!(!graph.remove_child(parent, stranger));
        assert!(graph.remove_child(parent, child));
        assert_eq!(graph.parent(child), None);
        assert!(graph.roots().contains(&child));
        assert!(!graph.remove_child(parent, child));
    }

    #[test]
    fn test_find_by_name_and_descendant() {
        let mut graph = SceneGraph::new();
        let level = named(&mut graph, "level");
        let player = named(&mut graph, "player");
        let gun = named(&mut graph, "gun");
        graph.add_child(level, player).unwrap();
        graph.add_child(player, gun).unwrap();

        assert_eq!(graph.find_by_name("gun"), Some(gun));
        assert_eq!(graph.find_descendant(level, "gun"), Some(gun));
        assert_eq!(graph.find_descendant(player, "player"), None);
        assert_eq!(graph.find_by_name("missing"), None);
        assert_eq!(graph.root_of(gun), Some(level));
    }

    #[test]
    fn test_pre_order_visits_parents_first() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node(None);
        let b = graph.create_node(None);
        let a1 = graph.create_node(None);
        let a2 = graph.create_node(None);
        graph.add_child(a, a1).unwrap();
        graph.add_child(a, a2).unwrap();

        assert_eq!(graph.pre_order(), vec![a, a1, a2, b]);
    }

    #[test]
    fn test_remove_subtree_drops_descendants() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node(None);
        let b = graph.create_node(None);
        let c = graph.create_node(None);
        graph.add_child(a, b).unwrap();
        graph.add_child(b, c).unwrap();

        graph.mark_pending_destroy(b);
        assert!(graph.is_destroy_requested(c));
        assert_eq!(graph.pending_roots(), vec![b]);

        let removed = graph.remove_subtree(b);
        assert_eq!(removed.len(), 2);
        assert!(!graph.contains(b));
        assert!(!graph.contains(c));
        assert!(graph.children(a).is_empty());
    }
}
