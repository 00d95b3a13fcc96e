//! Point light emitter

use crate::component::{Component, ComponentError, TokenStream};
use crate::foundation::math::Vec3;
use crate::render::ActiveLight;
use std::any::Any;

/// Constant attenuation term
pub const DEFAULT_CONSTANT: f32 = 1.0;
/// Linear attenuation term
pub const DEFAULT_LINEAR: f32 = 0.09;
/// Quadratic attenuation term
pub const DEFAULT_QUADRATIC: f32 = 0.032;

/// Point light located at its owner's world position
#[derive(Debug, Clone, PartialEq)]
pub struct LightComponent {
    /// Linear RGB color
    pub color: Vec3,
    /// Brightness multiplier
    pub intensity: f32,
    /// Constant attenuation
    pub constant: f32,
    /// Linear attenuation
    pub linear: f32,
    /// Quadratic attenuation
    pub quadratic: f32,
}

impl LightComponent {
    /// Registry key
    pub const TYPE_NAME: &'static str = "LightComponent";

    /// Create a light with default attenuation
    pub fn new(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            constant: DEFAULT_CONSTANT,
            linear: DEFAULT_LINEAR,
            quadratic: DEFAULT_QUADRATIC,
        }
    }

    /// Parse `r g b intensity [constant linear quadratic]`
    pub fn from_tokens(tokens: &mut TokenStream<'_>) -> Result<Self, ComponentError> {
        let color = tokens.next_vec3("color")?;
        let intensity = tokens.next_f32("intensity")?;
        let mut light = Self::new(color, intensity);
        if let Some(attenuation) = tokens.optional_vec3("attenuation")? {
            light.constant = attenuation.x;
            light.linear = attenuation.y;
            light.quadratic = attenuation.z;
        }
        Ok(light)
    }

    /// Snapshot for the render pass
    pub fn to_active(&self, position: Vec3) -> ActiveLight {
        ActiveLight {
            position,
            color: self.color,
            intensity: self.intensity,
            constant: self.constant,
            linear: self.linear,
            quadratic: self.quadratic,
        }
    }
}

impl Component for LightComponent {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
