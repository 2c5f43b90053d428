//! Derivation of the small and medium texture variants.
//!
//! The builder resizes the source image to each configured square size and
//! hands the copy to that variant's encoder. Small is always derived before
//! medium; when `parallel` is enabled both run on the rayon pool but errors
//! are still reported small-first.

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::TextureConfig;
use crate::image_source::SourceImage;
use crate::texture::resize::resize_square;
use crate::texture::{
    DdsFormat, DdsTextureEncoder, PvrTextureEncoder, TextureEncoder, TextureError, TextureFormat,
    MAX_DIMENSION,
};

/// Which of the two derived textures a payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Small,
    Medium,
}

impl VariantKind {
    /// Both variants in derivation order.
    pub const ALL: [VariantKind; 2] = [VariantKind::Small, VariantKind::Medium];

    /// Suffix used in texture asset names (`jacket_<id>_s`, `jacket_<id>_m`).
    pub fn suffix(&self) -> &'static str {
        match self {
            VariantKind::Small => "s",
            VariantKind::Medium => "m",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantKind::Small => f.write_str("small"),
            VariantKind::Medium => f.write_str("medium"),
        }
    }
}

/// An encoded texture variant.
///
/// The byte sequence is opaque to everything but the bundle serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedPayload {
    kind: VariantKind,
    dimension: u32,
    format: TextureFormat,
    data: Vec<u8>,
}

impl CompressedPayload {
    /// Create a payload, rejecting empty data.
    pub fn new(
        kind: VariantKind,
        dimension: u32,
        format: TextureFormat,
        data: Vec<u8>,
    ) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            dimension,
            format,
            data,
        })
    }

    pub fn kind(&self) -> VariantKind {
        self.kind
    }

    /// Side length of the square texture in pixels.
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed payload.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The two payloads derived from one source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPair {
    pub small: CompressedPayload,
    pub medium: CompressedPayload,
}

/// A variant failed to encode.
#[derive(Debug, Error)]
#[error("failed to encode {kind} variant ({encoder}, {dimension}×{dimension}): {source}")]
pub struct VariantError {
    pub kind: VariantKind,
    pub encoder: String,
    pub dimension: u32,
    #[source]
    pub source: TextureError,
}

/// Derives and encodes the small and medium texture variants.
///
/// # Example
///
/// ```
/// use jacketcreator::config::TextureConfig;
/// use jacketcreator::image_source::SourceImage;
/// use jacketcreator::texture::TextureVariantBuilder;
/// use image::RgbaImage;
///
/// let builder = TextureVariantBuilder::with_default_encoders(TextureConfig::default());
/// let source = SourceImage::from_rgba(RgbaImage::new(64, 64)).unwrap();
/// let pair = builder.build_variants(source).unwrap();
/// assert_eq!(pair.small.dimension(), 32);
/// assert_eq!(pair.medium.dimension(), 96);
/// ```
#[derive(Clone)]
pub struct TextureVariantBuilder {
    config: TextureConfig,
    small_encoder: Arc<dyn TextureEncoder>,
    medium_encoder: Arc<dyn TextureEncoder>,
}

impl fmt::Debug for TextureVariantBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureVariantBuilder")
            .field("config", &self.config)
            .field("small_encoder", &self.small_encoder.name())
            .field("medium_encoder", &self.medium_encoder.name())
            .finish()
    }
}

impl TextureVariantBuilder {
    /// Create a builder with explicit encoders.
    pub fn new(
        config: TextureConfig,
        small_encoder: Arc<dyn TextureEncoder>,
        medium_encoder: Arc<dyn TextureEncoder>,
    ) -> Self {
        Self {
            config,
            small_encoder,
            medium_encoder,
        }
    }

    /// Create a builder with PVR/ETC1 for the small variant and DDS/BC1 for
    /// the medium variant, configured from `config`.
    pub fn with_default_encoders(config: TextureConfig) -> Self {
        let (small, medium) = default_encoders(&config);
        Self::new(config, small, medium)
    }

    pub fn config(&self) -> &TextureConfig {
        &self.config
    }

    fn encoder(&self, kind: VariantKind) -> &dyn TextureEncoder {
        match kind {
            VariantKind::Small => self.small_encoder.as_ref(),
            VariantKind::Medium => self.medium_encoder.as_ref(),
        }
    }

    /// Resize and encode both variants.
    ///
    /// Consumes the source image; it is dropped once both variants exist.
    ///
    /// # Errors
    ///
    /// Returns the small variant's error if it fails, otherwise the medium
    /// variant's. No payload is returned unless both succeed.
    pub fn build_variants(&self, image: SourceImage) -> Result<VariantPair, VariantError> {
        let pixels = image.into_pixels();

        let (small, medium) = if self.config.parallel {
            rayon::join(
                || self.derive(VariantKind::Small, &pixels),
                || self.derive(VariantKind::Medium, &pixels),
            )
        } else {
            let small = self.derive(VariantKind::Small, &pixels)?;
            (Ok(small), self.derive(VariantKind::Medium, &pixels))
        };
        drop(pixels);

        Ok(VariantPair {
            small: small?,
            medium: medium?,
        })
    }

    /// Resize the source to one variant's size and encode it.
    pub fn derive(
        &self,
        kind: VariantKind,
        source: &RgbaImage,
    ) -> Result<CompressedPayload, VariantError> {
        let dimension = self.config.dimension(kind);
        let encoder = self.encoder(kind);
        let fail = |source: TextureError| VariantError {
            kind,
            encoder: encoder.name().to_string(),
            dimension,
            source,
        };

        if dimension > MAX_DIMENSION {
            return Err(fail(TextureError::dimensions(
                dimension,
                dimension,
                format!("must be at most {}", MAX_DIMENSION),
            )));
        }

        let data = {
            let resized = resize_square(source, dimension, self.config.filter);
            encoder.encode(&resized).map_err(fail)?
        };

        let size = data.len();
        let payload = CompressedPayload::new(kind, dimension, encoder.texture_format(), data)
            .ok_or_else(|| fail(TextureError::EmptyOutput(encoder.name().to_string())))?;

        info!(
            variant = %kind,
            encoder = encoder.name(),
            dimension,
            size_bytes = size,
            "Texture variant encoded"
        );
        debug!(
            variant = %kind,
            format = %payload.format(),
            container = encoder.extension(),
            "Variant format"
        );

        Ok(payload)
    }
}

/// Build the stock encoder pair for a texture configuration.
pub fn default_encoders(
    config: &TextureConfig,
) -> (Arc<dyn TextureEncoder>, Arc<dyn TextureEncoder>) {
    let mut pvr = PvrTextureEncoder::new().with_filter(config.filter);
    if let Some(count) = config.pvr_mipmaps {
        pvr = pvr.with_mipmap_count(count);
    }
    let dds = DdsTextureEncoder::new(DdsFormat::BC1)
        .with_mipmap_count(config.dds_mipmaps)
        .with_filter(config.filter);
    (Arc::new(pvr), Arc::new(dds))
}
