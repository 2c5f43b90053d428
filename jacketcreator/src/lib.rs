//! JacketCreator - song jacket bundles for mobile rhythm games
//!
//! This library turns one cover image into two Unity asset bundles, one per
//! mobile platform. Each bundle carries a small ETC1 texture in a PVR
//! container and a medium DXT1 texture in a DDS container.
//!
//! The pipeline is a straight line:
//!
//! ```text
//! image file -> image_source -> texture (small + medium) -> bundle -> disk
//! ```
//!
//! [`pipeline::PipelineDriver`] runs it end to end; the other modules can be
//! used on their own.

pub mod bundle;
pub mod config;
pub mod image_source;
pub mod logging;
pub mod pipeline;
pub mod texture;

/// Crate version, written by the CLI `--version` flag.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
