//! INI configuration file.
//!
//! ```ini
//! [texture]
//! small_size = 32
//! medium_size = 96
//! filter = lanczos3
//! pvr_mipmaps = full
//! dds_mipmaps = 1
//! parallel = false
//!
//! [bundle]
//! player_version = 5.x.x
//! engine_version = 5.4.5p1
//! ```
//!
//! Missing keys keep their defaults and unknown keys are ignored.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use tracing::debug;

use crate::config::{BundleConfig, ConfigError, TextureConfig};

const TEXTURE_SECTION: &str = "texture";
const BUNDLE_SECTION: &str = "bundle";

/// Name of the directory under the user config dir.
pub const CONFIG_DIR_NAME: &str = "jacketcreator";

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default location of the configuration file, if the platform has one.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Complete on-disk configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub texture: TextureConfig,
    pub bundle: BundleConfig,
}

impl ConfigFile {
    /// Load and validate the configuration at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ini(&ini)?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load the default configuration file, falling back to defaults when it
    /// does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        match config_file_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse an INI document, starting from defaults.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some(TEXTURE_SECTION)) {
            let texture = &mut config.texture;
            if let Some(value) = section.get("small_size") {
                texture.small_size = parse(TEXTURE_SECTION, "small_size", value)?;
            }
            if let Some(value) = section.get("medium_size") {
                texture.medium_size = parse(TEXTURE_SECTION, "medium_size", value)?;
            }
            if let Some(value) = section.get("filter") {
                texture.filter = value.parse().map_err(|reason: String| {
                    ConfigError::invalid(TEXTURE_SECTION, "filter", value, reason)
                })?;
            }
            if let Some(value) = section.get("pvr_mipmaps") {
                texture.pvr_mipmaps = if value.trim().eq_ignore_ascii_case("full") {
                    None
                } else {
                    Some(parse(TEXTURE_SECTION, "pvr_mipmaps", value)?)
                };
            }
            if let Some(value) = section.get("dds_mipmaps") {
                texture.dds_mipmaps = parse(TEXTURE_SECTION, "dds_mipmaps", value)?;
            }
            if let Some(value) = section.get("parallel") {
                texture.parallel = parse_bool(TEXTURE_SECTION, "parallel", value)?;
            }
        }

        if let Some(section) = ini.section(Some(BUNDLE_SECTION)) {
            if let Some(value) = section.get("player_version") {
                config.bundle.player_version = value.trim().to_string();
            }
            if let Some(value) = section.get("engine_version") {
                config.bundle.engine_version = value.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Render this configuration as an INI document.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        let texture = &self.texture;
        ini.with_section(Some(TEXTURE_SECTION))
            .set("small_size", texture.small_size.to_string())
            .set("medium_size", texture.medium_size.to_string())
            .set("filter", texture.filter.as_str())
            .set(
                "pvr_mipmaps",
                texture
                    .pvr_mipmaps
                    .map_or_else(|| "full".to_string(), |count| count.to_string()),
            )
            .set("dds_mipmaps", texture.dds_mipmaps.to_string())
            .set("parallel", texture.parallel.to_string());
        ini.with_section(Some(BUNDLE_SECTION))
            .set("player_version", self.bundle.player_version.as_str())
            .set("engine_version", self.bundle.engine_version.as_str());
        ini
    }

    /// Write this configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        self.to_ini().write_to_file(path).map_err(write_err)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.texture.validate()?;
        self.bundle.validate()
    }
}

fn parse<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(section, key, value, "not a valid number"))
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::invalid(section, key, value, "expected true or false")),
    }
}
