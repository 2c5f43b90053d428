//! Typed settings for texture derivation and bundle writing.

use crate::config::ConfigError;
use crate::texture::{ResizeFilter, VariantKind, MAX_DIMENSION};

/// Default side length of the small (PVR) variant.
pub const DEFAULT_SMALL_SIZE: u32 = 32;

/// Default side length of the medium (DDS) variant.
pub const DEFAULT_MEDIUM_SIZE: u32 = 96;

/// Default number of DDS mip levels (base level only).
pub const DEFAULT_DDS_MIPMAPS: usize = 1;

/// Default Unity player version written into bundle headers.
pub const DEFAULT_PLAYER_VERSION: &str = "5.x.x";

/// Default Unity engine version written into bundle headers.
pub const DEFAULT_ENGINE_VERSION: &str = "5.4.5p1";

/// Texture variant configuration.
///
/// Sizes are explicit so tests and callers can exercise arbitrary
/// dimensions; the block codecs require non-zero multiples of 4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureConfig {
    /// Side length of the small variant.
    pub small_size: u32,

    /// Side length of the medium variant.
    pub medium_size: u32,

    /// Resampling filter for variant derivation and mip levels.
    pub filter: ResizeFilter,

    /// PVR mip level limit, `None` for the full chain.
    pub pvr_mipmaps: Option<usize>,

    /// DDS mip level count.
    pub dds_mipmaps: usize,

    /// Derive the two variants concurrently.
    pub parallel: bool,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            small_size: DEFAULT_SMALL_SIZE,
            medium_size: DEFAULT_MEDIUM_SIZE,
            filter: ResizeFilter::default(),
            pvr_mipmaps: None,
            dds_mipmaps: DEFAULT_DDS_MIPMAPS,
            parallel: false,
        }
    }
}

impl TextureConfig {
    /// Set both variant sizes.
    pub fn with_sizes(mut self, small: u32, medium: u32) -> Self {
        self.small_size = small;
        self.medium_size = medium;
        self
    }

    /// Set the resampling filter.
    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Enable or disable concurrent variant derivation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Target side length for a variant.
    pub fn dimension(&self, kind: VariantKind) -> u32 {
        match kind {
            VariantKind::Small => self.small_size,
            VariantKind::Medium => self.medium_size,
        }
    }

    /// Check that both sizes are usable by 4×4 block codecs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, size) in [
            ("small_size", self.small_size),
            ("medium_size", self.medium_size),
        ] {
            if size == 0 || size % 4 != 0 {
                return Err(ConfigError::invalid(
                    "texture",
                    key,
                    size,
                    "must be a non-zero multiple of 4",
                ));
            }
            if size > MAX_DIMENSION {
                return Err(ConfigError::invalid(
                    "texture",
                    key,
                    size,
                    format!("must be at most {}", MAX_DIMENSION),
                ));
            }
        }
        if self.dds_mipmaps == 0 {
            return Err(ConfigError::invalid(
                "texture",
                "dds_mipmaps",
                0,
                "must be at least 1",
            ));
        }
        if self.pvr_mipmaps == Some(0) {
            return Err(ConfigError::invalid(
                "texture",
                "pvr_mipmaps",
                0,
                "must be at least 1, or 'full'",
            ));
        }
        Ok(())
    }
}

/// Bundle container configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    /// Player version string in the bundle header.
    pub player_version: String,

    /// Engine version string in the bundle header and serialized file.
    pub engine_version: String,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            player_version: DEFAULT_PLAYER_VERSION.to_string(),
            engine_version: DEFAULT_ENGINE_VERSION.to_string(),
        }
    }
}

impl BundleConfig {
    /// Set the engine version.
    pub fn with_engine_version(mut self, version: impl Into<String>) -> Self {
        self.engine_version = version.into();
        self
    }

    /// Check the version strings can be written as C strings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("player_version", &self.player_version),
            ("engine_version", &self.engine_version),
        ] {
            if value.is_empty() || value.contains('\0') {
                return Err(ConfigError::invalid(
                    "bundle",
                    key,
                    value,
                    "must be a non-empty string without NUL characters",
                ));
            }
        }
        Ok(())
    }
}
