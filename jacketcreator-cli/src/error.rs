//! CLI error type.

use jacketcreator::config::ConfigError;
use jacketcreator::pipeline::PipelineError;
use thiserror::Error;

/// Errors surfaced to the user as a single `ERROR:` line.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

