//! Vertical rigid motion: gravity, terminal velocity and velocity tilt

use crate::component::{Component, ComponentContext, ComponentError, TokenStream};
use crate::foundation::math::Vec3;
use std::any::Any;

/// Downward acceleration in units per second squared
pub const DEFAULT_GRAVITY: f32 = -16.0;

/// Lowest vertical velocity reachable by falling
pub const DEFAULT_TERMINAL_VELOCITY: f32 = -20.0;

/// Z tilt in degrees reached at terminal velocity
pub const MAX_TILT_DEGREES: f32 = 45.0;

/// Integrates velocity under gravity and moves its owner
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsComponent {
    /// Velocity in units per second
    pub velocity: Vec3,
    /// Vertical acceleration
    pub gravity: f32,
    /// Vertical velocity is clamped from below to this value
    pub terminal_velocity: f32,
}

impl Default for PhysicsComponent {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY, DEFAULT_TERMINAL_VELOCITY)
    }
}

impl PhysicsComponent {
    /// Registry key
    pub const TYPE_NAME: &'static str = "PhysicsComponent";

    /// Create a body at rest
    pub fn new(gravity: f32, terminal_velocity: f32) -> Self {
        Self {
            velocity: Vec3::zeros(),
            gravity,
            terminal_velocity,
        }
    }

    /// Parse `[gravity] [terminalVelocity]`
    pub fn from_tokens(tokens: &mut TokenStream<'_>) -> Result<Self, ComponentError> {
        let gravity = tokens.optional_f32("gravity")?.unwrap_or(DEFAULT_GRAVITY);
        let terminal_velocity = tokens
            .optional_f32("terminalVelocity")?
            .unwrap_or(DEFAULT_TERMINAL_VELOCITY);
        if terminal_velocity >= 0.0 {
            return Err(ComponentError::Invalid(format!(
                "terminal velocity must be negative, got {terminal_velocity}"
            )));
        }
        Ok(Self::new(gravity, terminal_velocity))
    }

    /// Replace the vertical velocity with `upward`
    pub fn apply_impulse(&mut self, upward: f32) {
        self.velocity.y = upward;
    }

    /// Z rotation matching the current vertical velocity
    pub fn tilt_degrees(&self) -> f32 {
        self.velocity.y * -MAX_TILT_DEGREES / self.terminal_velocity
    }
}

impl Component for PhysicsComponent {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn on_update(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32) {
        self.velocity.y += self.gravity * delta_time;
        if self.velocity.y < self.terminal_velocity {
            self.velocity.y = self.terminal_velocity;
        }

        let tilt = self.tilt_degrees();
        if let Some(transform) = ctx.transform_mut() {
            transform.position += self.velocity * delta_time;
            transform.rotation.z = tilt;
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
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_defaults_and_overrides() {
        let body = PhysicsComponent::from_tokens(&mut TokenStream::new("")).unwrap();
        assert_eq!(body, PhysicsComponent::default());

        let body = PhysicsComponent::from_tokens(&mut TokenStream::new("-9.8 -30")).unwrap();
        assert_eq!(body.gravity, -9.8);
        assert_eq!(body.terminal_velocity, -30.0);

        assert!(PhysicsComponent::from_tokens(&mut TokenStream::new("-9.8 5")).is_err());
        assert!(PhysicsComponent::from_tokens(&mut TokenStream::new("heavy")).is_err());
    }

    #[test]
    fn test_falls_and_tilts() {
        let mut scene = Scene::new();
        let node = scene.graph.create_node(None);
        scene.attach(node, Box::new(PhysicsComponent::default()), &NoInput).unwrap();

        scene.update(0.5, &NoInput);
        let body = scene.graph.component::<PhysicsComponent>(node).unwrap();
        assert_relative_eq!(body.velocity.y, -8.0);
        let transform = scene.graph.transform(node).unwrap();
        assert_relative_eq!(transform.position.y, -4.0);
        assert_relative_eq!(transform.rotation.z, -18.0);
    }

    #[test]
    fn test_terminal_velocity_clamps() {
        let mut scene = Scene::new();
        let node = scene.graph.create_node(None);
        scene.attach(node, Box::new(PhysicsComponent::default()), &NoInput).unwrap();

        scene.update(10.0, &NoInput);
        let body = scene.graph.component::<PhysicsComponent>(node).unwrap();
        assert_eq!(body.velocity.y, DEFAULT_TERMINAL_VELOCITY);
        assert_relative_eq!(scene.graph.transform(node).unwrap().rotation.z, -MAX_TILT_DEGREES);
    }

    #[test]
    fn test_impulse_replaces_vertical_velocity() {
        let mut body = PhysicsComponent::default();
        body.velocity = Vec3::new(1.0, -12.0, 0.0);
        body.apply_impulse(7.0);
        assert_eq!(body.velocity, Vec3::new(1.0, 7.0, 0.0));
        assert_relative_eq!(body.tilt_degrees(), 15.75);
    }
}
