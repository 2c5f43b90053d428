//! Song and asset path identifiers.

use std::fmt;

use crate::bundle::PlatformTarget;
use crate::texture::VariantKind;

/// A song identifier normalized into `0..=9999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SongId(u32);

impl SongId {
    /// Largest normalized identifier.
    pub const MAX: u32 = 9999;

    const MODULUS: u64 = Self::MAX as u64 + 1;

    /// Normalize a caller-supplied identifier to `abs(raw) mod 10000`.
    pub fn normalize(raw: i64) -> Self {
        Self((raw.unsigned_abs() % Self::MODULUS) as u32)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Output file name for a platform, e.g. `jacket_42_android.unity3d`.
    pub fn bundle_file_name(&self, platform: PlatformTarget) -> String {
        format!("jacket_{}_{}.unity3d", self.0, platform.slug())
    }

    /// Texture asset name for a variant, e.g. `jacket_42_s`.
    pub fn texture_name(&self, kind: VariantKind) -> String {
        format!("jacket_{}_{}", self.0, kind.suffix())
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifiers embedded in a jacket bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetIdentifiers {
    /// Path ID of the small (PVR) texture object.
    pub pvr_path_id: i64,

    /// Path ID of the medium (DDS) texture object.
    pub dds_path_id: i64,

    pub song_id: SongId,
}

impl AssetIdentifiers {
    pub fn new(song_id: SongId, pvr_path_id: i64, dds_path_id: i64) -> Self {
        Self {
            pvr_path_id,
            dds_path_id,
            song_id,
        }
    }

    /// Path ID of the texture slot a variant occupies.
    pub fn path_id(&self, kind: VariantKind) -> i64 {
        match kind {
            VariantKind::Small => self.pvr_path_id,
            VariantKind::Medium => self.dds_path_id,
        }
    }
}
