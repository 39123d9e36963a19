//! Image sniffing for embedded pictures.
//!
//! Only the header is decoded: the bytes go into the package untouched, we
//! just need the format (for the part extension and content type) and the
//! pixel size (for the aspect ratio).

use crate::error::{Error, Result};
use std::io::Cursor;

/// Picture formats that can be embedded in a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// MIME type, used as the `[Content_Types].xml` default.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }

    /// Part name extension under `ppt/media/`.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    /// Detect the format from magic bytes.
    pub fn detect_from_bytes(bytes: &[u8]) -> Option<Self> {
        match ::image::guess_format(bytes).ok()? {
            ::image::ImageFormat::Png => Some(Self::Png),
            ::image::ImageFormat::Jpeg => Some(Self::Jpeg),
            ::image::ImageFormat::Gif => Some(Self::Gif),
            ::image::ImageFormat::Bmp => Some(Self::Bmp),
            _ => None,
        }
    }
}

/// Format and pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width_px: u32,
    pub height_px: u32,
}

impl ImageInfo {
    /// Read format and dimensions from encoded image bytes.
    pub fn probe(bytes: &[u8]) -> Result<Self> {
        let format = ImageFormat::detect_from_bytes(bytes)
            .ok_or_else(|| Error::Image("unrecognized image format".to_string()))?;

        let reader = ::image::ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let (width_px, height_px) = reader.into_dimensions()?;
        if width_px == 0 || height_px == 0 {
            return Err(Error::Image(format!(
                "image has zero size ({}x{})",
                width_px, height_px
            )));
        }

        Ok(Self {
            format,
            width_px,
            height_px,
        })
    }

    /// Height that keeps the aspect ratio at the given display width.
    pub fn scaled_height(&self, width: i64) -> i64 {
        (width as i128 * self.height_px as i128 / self.width_px as i128) as i64
    }
}
