//! Texture encoding for jacket variants.
//!
//! This module provides a trait-based abstraction for texture encoding so
//! the pipeline can work with any codec without direct coupling.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │  TextureVariantBuilder   │
//! │                          │
//! │ small:  Arc<dyn TextureEncoder>
//! │ medium: Arc<dyn TextureEncoder>
//! └────────────┬─────────────┘
//!              │
//!              ▼
//! ┌──────────────────────────┐
//! │     TextureEncoder       │ (trait)
//! └────────────┬─────────────┘
//!              │
//!        ┌─────┴──────┐
//!        ▼            ▼
//! ┌────────────┐ ┌────────────┐
//! │ PvrTexture │ │ DdsTexture │
//! │  Encoder   │ │  Encoder   │
//! │  (ETC1)    │ │ (BC1/BC3)  │
//! └────────────┘ └────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use jacketcreator::texture::{DdsFormat, DdsTextureEncoder, TextureEncoder};
//! use std::sync::Arc;
//!
//! let encoder: Arc<dyn TextureEncoder> = Arc::new(DdsTextureEncoder::new(DdsFormat::BC1));
//! assert_eq!(encoder.extension(), "dds");
//! assert_eq!(encoder.expected_size(96, 96), 128 + 4608);
//! ```

mod dds;
mod encoder;
mod error;
mod format;
mod pvr;
pub mod resize;
mod variant;

pub use dds::{DdsFormat, DdsHeader, DdsTextureEncoder, DDS_HEADER_SIZE};
pub use encoder::{full_mip_count, TextureEncoder, MAX_DIMENSION};
pub use error::TextureError;
pub use format::TextureFormat;
pub use pvr::{PvrHeader, PvrTextureEncoder, PVR_HEADER_SIZE};
pub use resize::ResizeFilter;
pub use variant::{
    default_encoders, CompressedPayload, TextureVariantBuilder, VariantError, VariantKind,
    VariantPair,
};
