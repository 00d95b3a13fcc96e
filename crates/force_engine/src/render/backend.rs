//! Graphics capability interface
//!
//! The engine never talks to a graphics API directly. Everything it needs
//! (buffer and texture creation, shader compilation, named uniform upload and
//! draw calls) goes through [`GraphicsBackend`].

use super::RenderError;
use crate::assets::{ImageData, MeshData};
use crate::foundation::math::{Mat4, Vec2, Vec3};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Handle to vertex/index buffers stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Handle to a texture stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Handle to a linked shader program stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u64);

/// Value uploaded to a named uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// Integer, also used for sampler units
    Int(i32),
    /// Scalar
    Float(f32),
    /// 2-component vector
    Vec2(Vec2),
    /// 3-component vector
    Vec3(Vec3),
    /// 4x4 matrix, column-major
    Mat4(Mat4),
}

/// Graphics capability interface
pub trait GraphicsBackend {
    /// Upload geometry and return a handle to it
    fn create_mesh(&mut self, data: &MeshData) -> BackendResult<MeshHandle>;

    /// Upload decoded pixels and return a handle to the texture
    fn create_texture(&mut self, image: &ImageData) -> BackendResult<TextureHandle>;

    /// Compile and link a program from vertex and fragment source
    fn compile_shader(&mut self, vertex_source: &str, fragment_source: &str) -> BackendResult<ShaderHandle>;

    /// Make `shader` the active program
    fn use_shader(&mut self, shader: ShaderHandle) -> BackendResult<()>;

    /// Set a named uniform on `shader`
    fn set_uniform(&mut self, shader: ShaderHandle, name: &str, value: UniformValue) -> BackendResult<()>;

    /// Upload raw bytes to a named uniform block on `shader`
    fn set_uniform_block(&mut self, shader: ShaderHandle, name: &str, data: &[u8]) -> BackendResult<()>;

    /// Bind `texture` to texture unit `unit`
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) -> BackendResult<()>;

    /// Issue the draw call for a mesh with the current state
    fn draw_mesh(&mut self, mesh: MeshHandle) -> BackendResult<()>;

    /// Draw a line list (pairs of world-space points) in a flat color
    ///
    /// Used by the debug overlay; camera matrices are passed explicitly since
    /// no material shader is bound.
    fn draw_lines(&mut self, points: &[Vec3], color: Vec3, view_projection: &Mat4) -> BackendResult<()>;
}
