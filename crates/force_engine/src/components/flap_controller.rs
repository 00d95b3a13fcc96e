//! Key-triggered upward impulse

use super::PhysicsComponent;
use crate::component::{Component, ComponentContext, ComponentError, TokenStream};
use crate::input::KeyCode;
use std::any::Any;

/// Impulse applied when no force is given
pub const DEFAULT_FLAP_FORCE: f32 = 7.0;

/// Kicks the sibling [`PhysicsComponent`] upward on each key press
///
/// Fires on the press edge only; the key must be released before it fires
/// again.
#[derive(Debug, Clone, PartialEq)]
pub struct FlapControllerComponent {
    /// Upward velocity set by a flap
    pub force: f32,
    /// Trigger key
    pub key: KeyCode,
    was_pressed: bool,
    flaps: u32,
}

impl Default for FlapControllerComponent {
    fn default() -> Self {
        Self::new(DEFAULT_FLAP_FORCE, KeyCode::Space)
    }
}

impl FlapControllerComponent {
    /// Registry key
    pub const TYPE_NAME: &'static str = "FlapControllerComponent";

    /// Create a controller flapping with `force` on `key`
    pub fn new(force: f32, key: KeyCode) -> Self {
        Self {
            force,
            key,
            was_pressed: false,
            flaps: 0,
        }
    }

    /// Parse `[force] [key]`
    pub fn from_tokens(tokens: &mut TokenStream<'_>) -> Result<Self, ComponentError> {
        let force = tokens.optional_f32("force")?.unwrap_or(DEFAULT_FLAP_FORCE);
        let key = match tokens.optional_str() {
            Some(name) => name.parse::<KeyCode>().map_err(ComponentError::Invalid)?,
            None => KeyCode::Space,
        };
        Ok(Self::new(force, key))
    }

    /// Impulses applied so far
    pub fn flaps(&self) -> u32 {
        self.flaps
    }
}

impl Component for FlapControllerComponent {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn on_update(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32) {
        let pressed = ctx.input().is_key_down(self.key);

        if pressed && !self.was_pressed {
            let owner = ctx.owner();
            match ctx.sibling_mut::<PhysicsComponent>() {
                Some(physics) => {
                    physics.apply_impulse(self.force);
                    self.flaps += 1;
                }
                None => log::warn!("Flap on {:?} ignored: no PhysicsComponent", owner),
            }
        }
        self.was_pressed = pressed;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
