//! Rendering module
//!
//! Turns the scene graph into draw calls against a [`GraphicsBackend`]. The
//! backend owns every GPU object; this module only holds handles to them.
//!
//! A frame runs in two passes:
//!
//! 1. **Submit**: [`SceneRenderer::submit`] walks the graph in pre-order,
//!    collecting lights and appending [`DrawCommand`]s to the per-frame
//!    [`RenderQueue`].
//! 2. **Execute**: [`SceneRenderer::execute`] replays the queue in submission
//!    order, uploading camera, light and material state before each draw.
//!
//! An optional [`DebugOverlay`] pass draws wireframe boxes afterwards without
//! touching the queue.

pub mod backend;
pub mod camera;
pub mod debug_overlay;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod model;
pub mod recording;
pub mod render_queue;
pub mod renderer;
pub mod shader;
pub mod texture;

pub use backend::{BackendResult, GraphicsBackend, MeshHandle, ShaderHandle, TextureHandle, UniformValue};
pub use camera::CameraState;
pub use debug_overlay::{DebugOverlay, DebugOverlayPass};
pub use lighting::{ActiveLight, LightBlock, LightList};
pub use material::Material;
pub use mesh::Mesh;
pub use model::Model;
pub use recording::{BackendCall, RecordingBackend};
pub use render_queue::{DrawCommand, RenderQueue};
pub use renderer::{FrameStats, SceneRenderer};
pub use shader::Shader;
pub use texture::Texture;

use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// The graphics backend rejected an operation
    #[error("Backend error: {0}")]
    BackendError(String),

    /// Shader compilation or linking failed
    #[error("Shader compilation failed: {0}")]
    ShaderCompilation(String),

    /// A handle did not refer to a live backend object
    #[error("Invalid resource: {0}")]
    InvalidResource(String),
}
