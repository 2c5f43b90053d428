//! Pipeline error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::bundle::{BundleError, PlatformTarget};
use crate::image_source::ImageSourceError;
use crate::texture::VariantError;

/// Result type for pipeline runs.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that abort a pipeline run.
///
/// The first failure encountered is returned; nothing is retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Arguments were rejected before any work started.
    #[error("{0}")]
    InvalidInput(String),

    /// The source image could not be found or decoded.
    #[error(transparent)]
    Image(#[from] ImageSourceError),

    /// A texture variant could not be encoded.
    #[error(transparent)]
    Encode(#[from] VariantError),

    /// The output directory could not be resolved, created or written into.
    #[error("Tried to create directory '{}' but failed: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bundle serializer failed.
    #[error("failed to serialize {platform} bundle '{}': {source}", path.display())]
    Serialize {
        platform: PlatformTarget,
        path: PathBuf,
        #[source]
        source: BundleError,
    },

    /// A generic file-system failure.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
