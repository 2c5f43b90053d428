//! Error types for bundle serialization.

use std::io;

use thiserror::Error;

use crate::texture::VariantKind;

/// Errors that can occur while writing a bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    /// Writing to the output sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A texture payload is empty.
    #[error("{0} texture payload is empty")]
    EmptyPayload(VariantKind),

    /// A texture payload's container header is truncated or inconsistent.
    #[error("{kind} texture payload is malformed: {reason}")]
    MalformedPayload { kind: VariantKind, reason: String },

    /// Two objects in the bundle share a path ID.
    #[error("path ID {0} is used by more than one object")]
    DuplicatePathId(i64),
}
