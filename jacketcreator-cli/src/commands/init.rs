//! Init command - write a default configuration file.

use std::path::{Path, PathBuf};

use jacketcreator::config::{config_file_path, ConfigError, ConfigFile};

use crate::error::CliError;

/// Run the init command.
pub fn run(path: Option<PathBuf>, force: bool) -> Result<(), CliError> {
    let path = match path {
        Some(path) => path,
        None => config_file_path().ok_or(ConfigError::NoConfigDir)?,
    };
    write_default(&path, force)?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Edit this file to customize JacketCreator settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}

/// Write the default configuration, refusing to replace an existing file
/// unless `force` is set.
pub fn write_default(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    ConfigFile::default().save_to(path)
}
