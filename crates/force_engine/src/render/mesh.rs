//! Uploaded geometry

use super::MeshHandle;

/// A sub-mesh living in the graphics backend
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Backend buffers
    pub handle: MeshHandle,
    /// Number of vertices uploaded
    pub vertex_count: usize,
    /// Number of indices to draw
    pub index_count: usize,
    /// Whether the vertex data carries normals
    pub has_normals: bool,
    /// Whether the vertex data carries texture coordinates
    pub has_uvs: bool,
}
