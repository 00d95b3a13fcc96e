//! Uploaded textures

use super::TextureHandle;

/// A texture living in the graphics backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Backend texture
    pub handle: TextureHandle,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Channels in the source image
    pub channels: u8,
    /// File the pixels came from
    pub path: String,
}
