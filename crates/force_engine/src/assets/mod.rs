//! Asset loading
//!
//! Text loaders for materials and aggregate models, the resource cache they
//! fill, and the two import interfaces the engine consumes:
//!
//! - [`ModelImporter`]: file path → sub-mesh geometry
//! - [`ImageDecoder`]: file path → pixels
//!
//! Default implementations are [`ObjImporter`] and [`ImageFileDecoder`].

pub mod image_loader;
pub mod material_loader;
pub mod model_loader;
pub mod obj_loader;
pub mod primitives;
pub mod resource_cache;

pub use image_loader::{ImageData, ImageFileDecoder};
pub use material_loader::{load_material, parse_material, MaterialDesc};
pub use model_loader::{load_models, parse_models};
pub use obj_loader::ObjImporter;
pub use resource_cache::{AssetContext, ResourceCache};

use crate::render::RenderError;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Image data could not be decoded
    #[error("Decode failed: {0}")]
    Decode(String),

    /// Model file could not be imported
    #[error("Import failed: {0}")]
    Import(String),

    /// The graphics backend rejected an upload
    #[error(transparent)]
    Backend(#[from] RenderError),
}

impl AssetError {
    /// IO error for `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Interleaved vertex data for one sub-mesh
///
/// Each vertex is position (3), then normal (3) if `has_normals`, then UV (2)
/// if `has_uvs`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Interleaved vertex attributes
    pub vertices: Vec<f32>,
    /// Triangle list indices
    pub indices: Vec<u32>,
    /// Whether normals are interleaved
    pub has_normals: bool,
    /// Whether texture coordinates are interleaved
    pub has_uvs: bool,
}

impl MeshData {
    /// Floats per vertex
    pub fn stride(&self) -> usize {
        3 + if self.has_normals { 3 } else { 0 } + if self.has_uvs { 2 } else { 0 }
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.stride()
    }
}

/// Model-import collaborator
pub trait ModelImporter {
    /// Extract every sub-mesh of the file at `path`
    fn import(&self, path: &Path) -> Result<Vec<MeshData>, AssetError>;
}

/// Image-decode collaborator
pub trait ImageDecoder {
    /// Decode the image at `path`
    fn decode(&self, path: &Path) -> Result<ImageData, AssetError>;
}

/// A recoverable problem found while loading a text file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// File being loaded
    pub file: String,
    /// 1-based line number, 0 for file-level problems
    pub line: usize,
    /// Description
    pub message: String,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}: {}", self.file, self.message)
        } else {
            write!(f, "{}:{}: {}", self.file, self.line, self.message)
        }
    }
}

impl std::error::Error for LoadWarning {}

/// Outcome of loading one text file
///
/// Loaders never fail: what could be built is built, and every skipped line
/// or unresolved reference is recorded here (and logged).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records created (nodes, models, ...)
    pub created: usize,
    /// Problems encountered, in file order
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    /// Record and log a problem
    pub fn warn(&mut self, file: &str, line: usize, message: impl Into<String>) {
        let warning = LoadWarning {
            file: file.to_string(),
            line,
            message: message.into(),
        };
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Whether the file loaded without problems
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: Self) {
        self.created += other.created;
        self.warnings.extend(other.warnings);
    }
}
