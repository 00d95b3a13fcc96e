//! Surface description: shader, texture maps and scalar parameters

use super::{BackendResult, GraphicsBackend, Shader, Texture, UniformValue};
use crate::foundation::math::Vec2;
use std::sync::Arc;

/// Texture unit the diffuse map is bound to
pub const DIFFUSE_UNIT: u32 = 0;
/// Texture unit the specular map is bound to
pub const SPECULAR_UNIT: u32 = 1;
/// Texture unit the normal map is bound to
pub const NORMAL_UNIT: u32 = 2;

/// Material shared by reference between models and components
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Program used to draw; draws are skipped when absent
    pub shader: Option<Arc<Shader>>,
    /// Diffuse color map
    pub diffuse: Option<Arc<Texture>>,
    /// Specular intensity map
    pub specular: Option<Arc<Texture>>,
    /// Tangent-space normal map
    pub normal: Option<Arc<Texture>>,
    /// Specular exponent
    pub shininess: f32,
    /// UV multiplier
    pub texture_scale: Vec2,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            shader: None,
            diffuse: None,
            specular: None,
            normal: None,
            shininess: 32.0,
            texture_scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Material {
    /// Create a material drawn with `shader`
    pub fn with_shader(shader: Arc<Shader>) -> Self {
        Self {
            shader: Some(shader),
            ..Self::default()
        }
    }

    /// Upload this material's state to its shader
    ///
    /// Each map sets a `has*` flag and, when present, is bound to its fixed
    /// texture unit. Does nothing without a shader.
    pub fn apply(&self, backend: &mut dyn GraphicsBackend) -> BackendResult<()> {
        let Some(shader) = &self.shader else {
            return Ok(());
        };
        shader.bind(backend)?;

        let maps = [
            (&self.diffuse, "hasDiffuse", "material.diffuse", DIFFUSE_UNIT),
            (&self.specular, "hasSpecular", "material.specular", SPECULAR_UNIT),
            (&self.normal, "hasNormalMap", "material.normal", NORMAL_UNIT),
        ];
        for (texture, flag, sampler, unit) in maps {
            match texture {
                Some(texture) => {
                    shader.set(backend, flag, UniformValue::Float(1.0))?;
                    backend.bind_texture(unit, texture.handle)?;
                    shader.set(backend, sampler, UniformValue::Int(unit as i32))?;
                }
                None => shader.set(backend, flag, UniformValue::Float(0.0))?,
            }
        }

        shader.set(backend, "material.shininess", UniformValue::Float(self.shininess))?;
        shader.set(backend, "textureScale", UniformValue::Vec2(self.texture_scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{BackendCall, RecordingBackend, ShaderHandle, TextureHandle};

    fn texture(id: u64) -> Arc<Texture> {
        Arc::new(Texture {
            handle: TextureHandle(id),
            width: 1,
            height: 1,
            channels: 4,
            path: format!("tex{id}.png"),
        })
    }

    #[test]
    fn test_apply_binds_maps_to_fixed_units() {
        let shader = Arc::new(Shader {
            handle: ShaderHandle(3),
            vertex_path: "a.vs".into(),
            fragment_path: "a.fs".into(),
        });
        let material = Material {
            diffuse: Some(texture(10)),
            normal: Some(texture(12)),
            shininess: 8.0,
            ..Material::with_shader(shader)
        };

        let mut backend = RecordingBackend::new();
        material.apply(&mut backend).unwrap();

        assert_eq!(backend.calls()[0], BackendCall::UseShader(ShaderHandle(3)));
        assert!(backend.calls().contains(&BackendCall::BindTexture { unit: 0, texture: TextureHandle(10) }));
        assert!(backend.calls().contains(&BackendCall::BindTexture { unit: 2, texture: TextureHandle(12) }));
        assert_eq!(backend.uniform(ShaderHandle(3), "hasSpecular"), Some(UniformValue::Float(0.0)));
        assert_eq!(backend.uniform(ShaderHandle(3), "material.normal"), Some(UniformValue::Int(2)));
        assert_eq!(backend.uniform(ShaderHandle(3), "material.shininess"), Some(UniformValue::Float(8.0)));
    }

    #[test]
    fn test_apply_without_shader_is_silent() {
        let mut backend = RecordingBackend::new();
        Material::default().apply(&mut backend).unwrap();
        assert!(backend.calls().is_empty());
    }
}
