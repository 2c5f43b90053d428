//! Source image loading.
//!
//! [`load`] turns a path into a fully decoded [`SourceImage`] or fails; there
//! is no half-initialized state. The decoded pixels are converted to RGBA8
//! once so every downstream consumer sees the same layout.

mod error;

pub use error::ImageSourceError;

use std::fs;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use image::{ImageReader, RgbaImage};
use tracing::debug;

/// A decoded raster image in RGBA8 layout.
///
/// Owned by the pipeline run until both texture variants are derived, then
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    /// Wrap an already decoded buffer.
    ///
    /// Returns `None` for an empty (zero-area) buffer.
    pub fn from_rgba(pixels: RgbaImage) -> Option<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return None;
        }
        Some(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Borrow the pixel buffer.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Consume the image, returning the pixel buffer.
    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }
}

/// Load and decode the image at `path`.
///
/// The format is guessed from the file contents, not the extension, so a
/// mislabelled PNG still loads and a text file named `cover.png` still fails.
///
/// # Errors
///
/// - [`ImageSourceError::NotFound`] if `path` is empty or missing
/// - [`ImageSourceError::Decode`] if the contents are not a raster image
/// - [`ImageSourceError::Io`] for any other read failure
pub fn load(path: &Path) -> Result<SourceImage, ImageSourceError> {
    if path.as_os_str().is_empty() || !path.is_file() {
        return Err(ImageSourceError::NotFound(path.to_path_buf()));
    }

    let file = fs::File::open(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ImageSourceError::NotFound(path.to_path_buf())
        } else {
            ImageSourceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|source| ImageSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let decoded = reader.decode().map_err(|source| ImageSourceError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let pixels = decoded.to_rgba8();
    debug!(
        path = %path.display(),
        width = pixels.width(),
        height = pixels.height(),
        "Source image decoded"
    );

    SourceImage::from_rgba(pixels).ok_or_else(|| ImageSourceError::Decode {
        path: path.to_path_buf(),
        source: image::ImageError::Limits(image::error::LimitError::from_kind(
            image::error::LimitErrorKind::DimensionError,
        )),
    })
}
