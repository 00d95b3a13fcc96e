//! Constant-velocity drift

use crate::component::{Component, ComponentContext, ComponentError, TokenStream};
use crate::foundation::math::Vec3;
use std::any::Any;

/// Moves its owner by a fixed velocity every frame
#[derive(Debug, Clone, PartialEq)]
pub struct LinearMovementComponent {
    /// Units per second
    pub velocity: Vec3,
}

impl LinearMovementComponent {
    /// Registry key
    pub const TYPE_NAME: &'static str = "LinearMovementComponent";

    /// Create a drift with `velocity`
    pub fn new(velocity: Vec3) -> Self {
        Self { velocity }
    }

    /// Parse `vx vy vz`
    pub fn from_tokens(tokens: &mut TokenStream<'_>) -> Result<Self, ComponentError> {
        Ok(Self::new(tokens.next_vec3("velocity")?))
    }
}

impl Component for LinearMovementComponent {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn on_update(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32) {
        if let Some(transform) = ctx.transform_mut() {
            transform.position += self.velocity * delta_time;
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
    use crate::input::NoInput;
    use crate::scene::Scene;

    #[test]
    fn test_drifts_by_velocity() {
        let mut scene = Scene::new();
        let node = scene.graph.create_node(None);
        let drift = LinearMovementComponent::from_tokens(&mut TokenStream::new("-4 0 0.5")).unwrap();
        scene.attach(node, Box::new(drift), &NoInput).unwrap();

        scene.update(0.25, &NoInput);
        assert_eq!(scene.graph.transform(node).unwrap().position, Vec3::new(-1.0, 0.0, 0.125));
    }

    #[test]
    fn test_requires_three_components() {
        assert!(LinearMovementComponent::from_tokens(&mut TokenStream::new("1 2")).is_err());
    }
}
