//! Graphics backend that records calls instead of drawing
//!
//! Used headless (no window, no GPU) and as a test double: every call is
//! appended to a log that can be inspected afterwards.

use super::{BackendResult, GraphicsBackend, MeshHandle, RenderError, ShaderHandle, TextureHandle, UniformValue};
use crate::assets::{ImageData, MeshData};
use crate::foundation::math::{Mat4, Vec3};

/// A recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// Mesh upload
    CreateMesh {
        /// Returned handle
        handle: MeshHandle,
        /// Vertex count of the upload
        vertices: usize,
        /// Index count of the upload
        indices: usize,
    },
    /// Texture upload
    CreateTexture {
        /// Returned handle
        handle: TextureHandle,
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// Program compilation
    CompileShader(ShaderHandle),
    /// Program activation
    UseShader(ShaderHandle),
    /// Named uniform upload
    SetUniform {
        /// Target program
        shader: ShaderHandle,
        /// Uniform name
        name: String,
        /// Uploaded value
        value: UniformValue,
    },
    /// Uniform block upload
    SetUniformBlock {
        /// Target program
        shader: ShaderHandle,
        /// Block name
        name: String,
        /// Size of the uploaded data
        bytes: usize,
    },
    /// Texture binding
    BindTexture {
        /// Texture unit
        unit: u32,
        /// Bound texture
        texture: TextureHandle,
    },
    /// Mesh draw
    DrawMesh(MeshHandle),
    /// Line list draw
    DrawLines {
        /// Number of points (two per segment)
        points: usize,
        /// Line color
        color: Vec3,
    },
}

/// In-memory [`GraphicsBackend`]
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    next_handle: u64,
    reject_shaders: bool,
}

impl RecordingBackend {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every shader compilation fail
    pub fn with_failing_shaders(mut self) -> Self {
        self.reject_shaders = true;
        self
    }

    /// Recorded calls in order
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Forget recorded calls; handles keep counting up
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Meshes drawn, in draw order
    pub fn drawn_meshes(&self) -> Vec<MeshHandle> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::DrawMesh(mesh) => Some(*mesh),
                _ => None,
            })
            .collect()
    }

    /// Last value uploaded to `name` on `shader`
    pub fn uniform(&self, shader: ShaderHandle, name: &str) -> Option<UniformValue> {
        self.calls.iter().rev().find_map(|call| match call {
            BackendCall::SetUniform {
                shader: target,
                name: uniform,
                value,
            } if *target == shader && uniform == name => Some(*value),
            _ => None,
        })
    }

    /// Number of recorded calls matching `predicate`
    pub fn count(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    fn allocate(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl GraphicsBackend for RecordingBackend {
    fn create_mesh(&mut self, data: &MeshData) -> BackendResult<MeshHandle> {
        let handle = MeshHandle(self.allocate());
        self.calls.push(BackendCall::CreateMesh {
            handle,
            vertices: data.vertex_count(),
            indices: data.indices.len(),
        });
        Ok(handle)
    }

    fn create_texture(&mut self, image: &ImageData) -> BackendResult<TextureHandle> {
        let handle = TextureHandle(self.allocate());
        self.calls.push(BackendCall::CreateTexture {
            handle,
            width: image.width,
            height: image.height,
        });
        Ok(handle)
    }

    fn compile_shader(&mut self, vertex_source: &str, fragment_source: &str) -> BackendResult<ShaderHandle> {
        if self.reject_shaders {
            return Err(RenderError::ShaderCompilation(format!(
                "rejected program ({} + {} bytes)",
                vertex_source.len(),
                fragment_source.len()
            )));
        }
        let handle = ShaderHandle(self.allocate());
        self.calls.push(BackendCall::CompileShader(handle));
        Ok(handle)
    }

    fn use_shader(&mut self, shader: ShaderHandle) -> BackendResult<()> {
        self.calls.push(BackendCall::UseShader(shader));
        Ok(())
    }

    fn set_uniform(&mut self, shader: ShaderHandle, name: &str, value: UniformValue) -> BackendResult<()> {
        self.calls.push(BackendCall::SetUniform {
            shader,
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn set_uniform_block(&mut self, shader: ShaderHandle, name: &str, data: &[u8]) -> BackendResult<()> {
        self.calls.push(BackendCall::SetUniformBlock {
            shader,
            name: name.to_string(),
            bytes: data.len(),
        });
        Ok(())
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) -> BackendResult<()> {
        self.calls.push(BackendCall::BindTexture { unit, texture });
        Ok(())
    }

    fn draw_mesh(&mut self, mesh: MeshHandle) -> BackendResult<()> {
        self.calls.push(BackendCall::DrawMesh(mesh));
        Ok(())
    }

    fn draw_lines(&mut self, points: &[Vec3], color: Vec3, _view_projection: &Mat4) -> BackendResult<()> {
        self.calls.push(BackendCall::DrawLines {
            points: points.len(),
            color,
        });
        Ok(())
    }
}
