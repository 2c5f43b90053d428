//! Error types for source image loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the source image.
#[derive(Debug, Error)]
pub enum ImageSourceError {
    /// The path is empty or does not point at an existing file.
    #[error("image file '{}' is not found", .0.display())]
    NotFound(PathBuf),

    /// The file exists but is not a decodable raster image.
    #[error("cannot decode image file '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The file exists but could not be read.
    #[error("cannot read image file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
