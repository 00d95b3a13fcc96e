//! Compiled shader programs

use super::{BackendResult, GraphicsBackend, ShaderHandle, UniformValue};

/// A linked program and the files it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    /// Backend program
    pub handle: ShaderHandle,
    /// Vertex shader path
    pub vertex_path: String,
    /// Fragment shader path
    pub fragment_path: String,
}

impl Shader {
    /// Make this program active
    pub fn bind(&self, backend: &mut dyn GraphicsBackend) -> BackendResult<()> {
        backend.use_shader(self.handle)
    }

    /// Set a named uniform on this program
    pub fn set(&self, backend: &mut dyn GraphicsBackend, name: &str, value: UniformValue) -> BackendResult<()> {
        backend.set_uniform(self.handle, name, value)
    }
}
