//! Configuration error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, validating or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or parsed.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// The configuration file could not be written.
    #[error("failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A value is present but unusable.
    #[error("invalid value '{value}' for [{section}] {key}: {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Refusing to overwrite an existing file.
    #[error("config file already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    /// No per-user configuration directory on this platform.
    #[error("could not determine the user configuration directory")]
    NoConfigDir,
}

impl ConfigError {
    pub(crate) fn invalid(
        section: &str,
        key: &str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
