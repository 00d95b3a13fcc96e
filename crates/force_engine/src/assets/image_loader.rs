//! Image decoding for texture upload

use super::{AssetError, ImageDecoder};
use image::DynamicImage;
use std::path::Path;

/// Decoded pixels ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Tightly packed rows, `channels` bytes per pixel, bottom row first
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of color channels (1, 3 or 4)
    pub channels: u8,
}

impl ImageData {
    /// Decode an image file, keeping its channel count
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();
        log::debug!("Loading image from: {:?}", path_ref);

        let img = image::open(path_ref)
            .map_err(|e| AssetError::Decode(format!("{}: {}", path_ref.display(), e)))?;
        let image = Self::from_dynamic(img.flipv());

        log::info!(
            "Loaded image {}x{} ({} channels) from {:?}",
            image.width,
            image.height,
            image.channels,
            path_ref
        );
        Ok(image)
    }

    /// Decode an image held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes).map_err(|e| AssetError::Decode(e.to_string()))?;
        Ok(Self::from_dynamic(img.flipv()))
    }

    /// Normalize to 8-bit grey, RGB or RGBA
    fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let channels = img.color().channel_count();
        let (data, channels) = match channels {
            1 => (img.into_luma8().into_raw(), 1),
            3 => (img.into_rgb8().into_raw(), 3),
            _ => (img.into_rgba8().into_raw(), 4),
        };
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    /// Create a solid RGBA image
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        Self {
            data: color.repeat(pixel_count),
            width,
            height,
            channels: 4,
        }
    }

    /// Get the size of the image data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// [`ImageDecoder`] backed by the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFileDecoder;

impl ImageDecoder for ImageFileDecoder {
    fn decode(&self, path: &Path) -> Result<ImageData, AssetError> {
        ImageData::from_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 4, [255, 0, 0, 255]);
        assert_eq!(img.channels, 4);
        assert_eq!(img.size_bytes(), 4 * 4 * 4);
        assert_eq!(&img.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_rgb_file_keeps_three_channels_and_flips_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stripe.png");
        let buffer = ImageBuffer::from_fn(1, 2, |_, y| if y == 0 { Rgb([255u8, 0, 0]) } else { Rgb([0, 0, 255]) });
        buffer.save(&path).unwrap();

        let img = ImageFileDecoder.decode(&path).unwrap();
        assert_eq!((img.width, img.height, img.channels), (1, 2, 3));
        // Bottom row (blue) comes first after the flip
        assert_eq!(&img.data[0..3], &[0, 0, 255]);
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let err = ImageFileDecoder.decode(Path::new("does/not/exist.png")).unwrap_err();
        assert!(matches!(err, AssetError::Decode(_)));
    }
}
