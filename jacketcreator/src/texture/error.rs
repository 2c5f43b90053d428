//! Error types for texture encoding operations.

use thiserror::Error;

/// Errors that can occur during texture encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextureError {
    /// Image dimensions are invalid for encoding.
    #[error("Invalid dimensions {width}×{height}: {reason}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: String,
    },

    /// Encoding operation failed.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// The encoder finished without producing any bytes.
    #[error("Encoder '{0}' produced no output")]
    EmptyOutput(String),
}

impl TextureError {
    /// Shorthand for [`TextureError::InvalidDimensions`].
    pub(crate) fn dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        TextureError::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}
