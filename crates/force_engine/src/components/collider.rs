//! Axis-aligned box collider backed by the scene's collider registry

use crate::component::{Component, ComponentContext, ComponentError, DetachContext, TokenStream};
use crate::foundation::math::Vec3;
use crate::physics::{ColliderEntry, ColliderId};
use std::any::Any;

/// Box centered on its owner's world position
///
/// Registers itself on attach and unregisters when its node is swept, so
/// the registry only ever holds live colliders.
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderComponent {
    /// Full box size
    pub size: Vec3,
    /// Triggers report overlaps without being solid
    pub is_trigger: bool,
    id: Option<ColliderId>,
}

impl ColliderComponent {
    /// Registry key
    pub const TYPE_NAME: &'static str = "ColliderComponent";

    /// Create an unregistered collider of the given full size
    pub fn new(size: Vec3, is_trigger: bool) -> Self {
        Self {
            size,
            is_trigger,
            id: None,
        }
    }

    /// Parse `sx sy sz [isTrigger]`
    pub fn from_tokens(tokens: &mut TokenStream<'_>) -> Result<Self, ComponentError> {
        let size = tokens.next_vec3("size")?;
        if size.iter().any(|&extent| extent < 0.0) {
            return Err(ComponentError::Invalid(format!("negative collider size {:?}", size)));
        }
        let is_trigger = tokens.optional_bool("isTrigger")?.unwrap_or(false);
        Ok(Self::new(size, is_trigger))
    }

    /// Half the box size on each axis
    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    /// Registry handle, once attached
    pub fn collider_id(&self) -> Option<ColliderId> {
        self.id
    }
}

impl Component for ColliderComponent {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn on_attach(&mut self, ctx: &mut ComponentContext<'_>) {
        let entry = ColliderEntry {
            owner: ctx.owner(),
            half_extents: self.half_extents(),
            is_trigger: self.is_trigger,
        };
        self.id = Some(ctx.colliders.register(entry));
    }

    fn on_detach(&mut self, ctx: &mut DetachContext<'_>) {
        if let Some(id) = self.id.take() {
            ctx.colliders.unregister(id);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::input::NoInput;
    use crate::scene::Scene;

    #[test]
    fn test_parse_trigger_flag() {
        let collider = ColliderComponent::from_tokens(&mut TokenStream::new("2 4 1")).unwrap();
        assert_eq!(collider.half_extents(), Vec3::new(1.0, 2.0, 0.5));
        assert!(!collider.is_trigger);

        let trigger = ColliderComponent::from_tokens(&mut TokenStream::new("1 1 1 1")).unwrap();
        assert!(trigger.is_trigger);

        assert!(ColliderComponent::from_tokens(&mut TokenStream::new("1 -1 1")).is_err());
    }

    #[test]
    fn test_registered_for_node_lifetime() {
        let mut scene = Scene::new();
        let a = scene.graph.create_node(None);
        let b = scene
            .graph
            .spawn(None, Transform::from_position(Vec3::new(1.0, 0.0, 5.0)), None)
            .unwrap();
        scene.attach(a, Box::new(ColliderComponent::new(Vec3::new(2.0, 2.0, 2.0), false)), &NoInput).unwrap();
        scene.attach(b, Box::new(ColliderComponent::new(Vec3::new(2.0, 2.0, 2.0), true)), &NoInput).unwrap();
        scene.recompute_transforms();

        let id_a = scene.graph.component::<ColliderComponent>(a).unwrap().collider_id().unwrap();
        let id_b = scene.colliders.find_by_owner(b).unwrap();
        assert_eq!(scene.colliders.ids(), &[id_a, id_b]);
        assert!(scene.colliders.get(id_b).unwrap().is_trigger);
        assert!(scene.colliders.overlaps(id_a, id_b, &scene.graph));

        scene.graph.mark_pending_destroy(b);
        scene.destroy_pending();
        assert_eq!(scene.colliders.ids(), &[id_a]);
        assert!(!scene.colliders.overlaps(id_a, id_b, &scene.graph));
    }
}
