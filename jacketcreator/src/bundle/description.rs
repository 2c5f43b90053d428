//! In-memory description of one platform's bundle.

use crate::bundle::{AssetIdentifiers, PlatformTarget};
use crate::texture::{CompressedPayload, VariantKind};

/// Everything the serializer needs to write one bundle.
///
/// Borrows the payloads so both platform bundles share a single encoded
/// pair; only the identifiers and platform tag differ between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleDescription<'a> {
    pub small: &'a CompressedPayload,
    pub medium: &'a CompressedPayload,
    pub ids: AssetIdentifiers,
    pub platform: PlatformTarget,
}

impl<'a> BundleDescription<'a> {
    /// The payload for a variant.
    pub fn payload(&self, kind: VariantKind) -> &'a CompressedPayload {
        match kind {
            VariantKind::Small => self.small,
            VariantKind::Medium => self.medium,
        }
    }

    /// Output file name for this bundle.
    pub fn file_name(&self) -> String {
        self.ids.song_id.bundle_file_name(self.platform)
    }
}

/// Combine payloads, identifiers and a platform tag.
///
/// Performs no validation: identifiers are expected to be normalized
/// upstream.
pub fn assemble<'a>(
    small: &'a CompressedPayload,
    medium: &'a CompressedPayload,
    ids: AssetIdentifiers,
    platform: PlatformTarget,
) -> BundleDescription<'a> {
    BundleDescription {
        small,
        medium,
        ids,
        platform,
    }
}
