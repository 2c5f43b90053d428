//! Configuration for texture derivation and bundle writing.
//!
//! [`TextureConfig`] and [`BundleConfig`] are plain values passed into the
//! components that need them. [`ConfigFile`] loads them from an INI file.

mod error;
mod file;
mod settings;

pub use error::ConfigError;
pub use file::{config_file_path, ConfigFile, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
pub use settings::{
    BundleConfig, TextureConfig, DEFAULT_DDS_MIPMAPS, DEFAULT_ENGINE_VERSION,
    DEFAULT_MEDIUM_SIZE, DEFAULT_PLAYER_VERSION, DEFAULT_SMALL_SIZE,
};
