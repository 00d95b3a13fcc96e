//! Axis-aligned boxes and the collider registry

use crate::foundation::math::Vec3;
use crate::scene::{NodeId, SceneGraph};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a registered collider
    pub struct ColliderId;
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given half-extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this AABB intersects another on all three axes
    pub fn intersects(&self, other: &Self) -> bool {
        self.intersects_xy(other) && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Check for overlap on X and Y only; touching edges count as a hit
    pub fn intersects_xy(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// The eight corners, bottom face first
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
        ]
    }
}

/// A registered box collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderEntry {
    /// Node whose world position centers the box
    pub owner: NodeId,
    /// Half the box size on each axis
    pub half_extents: Vec3,
    /// Trigger colliders report overlaps but are not solid
    pub is_trigger: bool,
}

/// Ordered set of live colliders
///
/// Mutated only when a collider is attached or its node is swept.
#[derive(Debug, Default)]
pub struct ColliderRegistry {
    entries: SlotMap<ColliderId, ColliderEntry>,
    order: Vec<ColliderId>,
}

impl ColliderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collider at the end of the iteration order
    pub fn register(&mut self, entry: ColliderEntry) -> ColliderId {
        let id = self.entries.insert(entry);
        self.order.push(id);
        log::trace!("Registered collider {:?} for node {:?}", id, entry.owner);
        id
    }

    /// Remove a collider
    pub fn unregister(&mut self, id: ColliderId) -> Option<ColliderEntry> {
        let entry = self.entries.remove(id)?;
        self.order.retain(|&other| other != id);
        log::trace!("Unregistered collider {:?}", id);
        Some(entry)
    }

    /// Look up a collider
    pub fn get(&self, id: ColliderId) -> Option<&ColliderEntry> {
        self.entries.get(id)
    }

    /// Collider ids in insertion order
    pub fn ids(&self) -> &[ColliderId] {
        &self.order
    }

    /// Colliders in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ColliderId, &ColliderEntry)> {
        self.order.iter().filter_map(|&id| self.entries.get(id).map(|e| (id, e)))
    }

    /// Number of live colliders
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no collider is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First collider owned by `owner`
    pub fn find_by_owner(&self, owner: NodeId) -> Option<ColliderId> {
        self.iter().find(|(_, entry)| entry.owner == owner).map(|(id, _)| id)
    }

    /// World-space box of a collider, centered on the owner's current position
    ///
    /// `None` when the collider or its owner is gone.
    pub fn bounds(&self, id: ColliderId, graph: &SceneGraph) -> Option<Aabb> {
        let entry = self.entries.get(id)?;
        let center = graph.current_world_position(entry.owner)?;
        Some(Aabb::from_center_extents(center, entry.half_extents))
    }

    /// Whether two colliders overlap on X and Y
    ///
    /// Z is ignored. Unknown colliders and removed owners never overlap.
    pub fn overlaps(&self, a: ColliderId, b: ColliderId, graph: &SceneGraph) -> bool {
        match (self.bounds(a, graph), self.bounds(b, graph)) {
            (Some(box_a), Some(box_b)) => box_a.intersects_xy(&box_b),
            _ => {
                log::trace!("Overlap query on unresolved collider {:?}/{:?}", a, b);
                false
            }
        }
    }

    /// Every collider overlapping `id`, in insertion order, skipping `id` and `exclude`
    pub fn overlapping(&self, id: ColliderId, exclude: &[ColliderId], graph: &SceneGraph) -> Vec<ColliderId> {
        self.order
            .iter()
            .copied()
            .filter(|&other| other != id && !exclude.contains(&other))
            .filter(|&other| self.overlaps(id, other, graph))
            .collect()
    }
}
