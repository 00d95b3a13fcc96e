//! Perspective camera module

use crate::component::{Component, ComponentError, TokenStream};
use crate::foundation::math::Mat4;
use crate::render::camera::{CameraState, DEFAULT_FAR, DEFAULT_FOV, DEFAULT_NEAR};
use std::any::Any;

/// Aspect ratio used when none is given
pub const DEFAULT_ASPECT: f32 = 800.0 / 600.0;

/// Projection parameters; the view comes from the owner's world matrix
#[derive(Debug, Clone, PartialEq)]
pub struct CameraComponent {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Width over height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            fov: DEFAULT_FOV,
            aspect: DEFAULT_ASPECT,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }
}

impl CameraComponent {
    /// Registry key
    pub const TYPE_NAME: &'static str = "CameraComponent";

    /// Parse `[fov [aspect [near [far]]]]`
    pub fn from_tokens(tokens: &mut TokenStream<'_>) -> Result<Self, ComponentError> {
        let mut camera = Self::default();
        if let Some(fov) = tokens.optional_f32("fov")? {
            camera.fov = fov;
        }
        if let Some(aspect) = tokens.optional_f32("aspect")? {
            camera.aspect = aspect;
        }
        if let Some(near) = tokens.optional_f32("near")? {
            camera.near = near;
        }
        if let Some(far) = tokens.optional_f32("far")? {
            camera.far = far;
        }

        if camera.near <= 0.0 || camera.far <= camera.near {
            return Err(ComponentError::Invalid(format!(
                "clip range {}..{} is empty",
                camera.near, camera.far
            )));
        }
        if camera.aspect <= 0.0 {
            return Err(ComponentError::Invalid(format!("aspect ratio {} must be positive", camera.aspect)));
        }
        Ok(camera)
    }

    /// View, projection and eye position for an owner at `world`
    pub fn state(&self, world: &Mat4) -> CameraState {
        CameraState::from_world(world, self.fov, self.aspect, self.near, self.far)
    }
}

impl Component for CameraComponent {
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
