//! Pipeline inputs and outputs.

use std::path::PathBuf;

use crate::bundle::SongId;

/// One jacket build request, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JacketRequest {
    /// Source image path.
    pub image_path: PathBuf,

    /// Directory the two bundles are written to. Created if absent.
    pub output_dir: PathBuf,

    /// Raw song identifier, normalized before use.
    pub song_id: i64,

    /// Path ID of the small (PVR) texture.
    pub pvr_path_id: i64,

    /// Path ID of the medium (DDS) texture.
    pub dds_path_id: i64,
}

impl JacketRequest {
    pub fn new(
        image_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        song_id: i64,
        pvr_path_id: i64,
        dds_path_id: i64,
    ) -> Self {
        Self {
            image_path: image_path.into(),
            output_dir: output_dir.into(),
            song_id,
            pvr_path_id,
            dds_path_id,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Absolute output directory.
    pub output_dir: PathBuf,

    /// Normalized song identifier used in file names.
    pub song_id: SongId,

    /// Written bundles, Android first.
    pub files: Vec<PathBuf>,
}
