//! Lights collected during the submit pass
//!
//! Every light-emitting module found in the graph becomes an [`ActiveLight`].
//! The list is capped; lights beyond the cap are dropped for the frame and a
//! warning is logged the first time that happens.

use crate::foundation::math::Vec3;
use bytemuck::{Pod, Zeroable};

/// Largest light count the uniform block can hold
pub const MAX_GPU_LIGHTS: usize = 16;

/// A light resolved to world space for this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveLight {
    /// World position of the emitting node
    pub position: Vec3,
    /// Linear RGB color
    pub color: Vec3,
    /// Color multiplier
    pub intensity: f32,
    /// Constant attenuation term
    pub constant: f32,
    /// Linear attenuation term
    pub linear: f32,
    /// Quadratic attenuation term
    pub quadratic: f32,
}

/// One light as laid out in the uniform block
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct GpuLight {
    /// xyz = position, w = intensity
    pub position_intensity: [f32; 4],
    /// rgb = color, a = 1
    pub color: [f32; 4],
    /// x = constant, y = linear, z = quadratic
    pub attenuation: [f32; 4],
}

/// Uniform block uploaded as `Lights`
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightBlock {
    /// Light slots; only the first `count[0]` are meaningful
    pub lights: [GpuLight; MAX_GPU_LIGHTS],
    /// x = number of active lights
    pub count: [u32; 4],
}

impl From<&ActiveLight> for GpuLight {
    fn from(light: &ActiveLight) -> Self {
        Self {
            position_intensity: [light.position.x, light.position.y, light.position.z, light.intensity],
            color: [light.color.x, light.color.y, light.color.z, 1.0],
            attenuation: [light.constant, light.linear, light.quadratic, 0.0],
        }
    }
}

/// Capped per-frame light list
#[derive(Debug)]
pub struct LightList {
    lights: Vec<ActiveLight>,
    capacity: usize,
    dropped: usize,
    warned: bool,
}

impl LightList {
    /// Create a list holding at most `capacity` lights (clamped to the block size)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_GPU_LIGHTS);
        Self {
            lights: Vec::with_capacity(capacity),
            capacity,
            dropped: 0,
            warned: false,
        }
    }

    /// Forget this frame's lights
    pub fn clear(&mut self) {
        self.lights.clear();
        self.dropped = 0;
    }

    /// Record a light; returns `false` if the cap was reached
    pub fn push(&mut self, light: ActiveLight) -> bool {
        if self.lights.len() < self.capacity {
            self.lights.push(light);
            return true;
        }
        self.dropped += 1;
        if !self.warned {
            log::warn!(
                "More than {} lights in the scene; extra lights are ignored",
                self.capacity
            );
            self.warned = true;
        }
        false
    }

    /// Lights collected this frame
    pub fn as_slice(&self) -> &[ActiveLight] {
        &self.lights
    }

    /// Number of lights collected this frame
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    /// Whether no light was collected
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Lights dropped this frame because of the cap
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Pack the lights for upload
    pub fn to_block(&self) -> LightBlock {
        let mut block = LightBlock::zeroed();
        for (slot, light) in block.lights.iter_mut().zip(&self.lights) {
            *slot = GpuLight::from(light);
        }
        block.count[0] = self.lights.len() as u32;
        block
    }
}
