//! Build command - turn one cover image into both platform bundles.

use std::path::PathBuf;

use jacketcreator::config::ConfigFile;
use jacketcreator::pipeline::{JacketRequest, PipelineDriver, PipelineSummary};
use tracing::debug;

use crate::error::CliError;

/// Arguments for the build command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArgs {
    pub image: PathBuf,
    pub output: PathBuf,
    pub song_id: i64,
    pub pvr_path_id: i64,
    pub dds_path_id: i64,
    pub config: Option<PathBuf>,
    pub small_size: Option<u32>,
    pub medium_size: Option<u32>,
    pub parallel: bool,
}

/// Run the build command and print the completion line.
pub fn run(args: BuildArgs) -> Result<(), CliError> {
    let summary = execute(&args)?;
    println!("{}", completion_message(&summary));
    Ok(())
}

/// Resolve configuration and run the pipeline.
pub fn execute(args: &BuildArgs) -> Result<PipelineSummary, CliError> {
    let config = resolve_config(args)?;
    debug!(?config, "Resolved configuration");

    let driver = PipelineDriver::from_config(&config)?;
    let request = JacketRequest::new(
        &args.image,
        &args.output,
        args.song_id,
        args.pvr_path_id,
        args.dds_path_id,
    );
    Ok(driver.run(&request)?)
}

/// Load the config file, then apply CLI overrides.
///
/// CLI takes precedence, then the file, then built-in defaults.
pub fn resolve_config(args: &BuildArgs) -> Result<ConfigFile, CliError> {
    let mut config = match &args.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };

    if let Some(size) = args.small_size {
        config.texture.small_size = size;
    }
    if let Some(size) = args.medium_size {
        config.texture.medium_size = size;
    }
    if args.parallel {
        config.texture.parallel = true;
    }
    Ok(config)
}

pub fn completion_message(summary: &PipelineSummary) -> String {
    format!(
        "Building complete. Files are written to '{}', song ID = {}.",
        summary.output_dir.display(),
        summary.song_id
    )
}
