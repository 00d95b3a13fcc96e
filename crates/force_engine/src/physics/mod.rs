//! Collision support
//!
//! Colliders register themselves in a [`ColliderRegistry`] when attached and
//! leave it when their node is destroyed. Overlap queries are linear over the
//! registry in insertion order.

pub mod collision;

pub use collision::{Aabb, ColliderEntry, ColliderId, ColliderRegistry};
