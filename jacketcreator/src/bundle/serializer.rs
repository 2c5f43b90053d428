//! The [`BundleSerializer`] trait.

use std::io::Write;

use crate::bundle::{BundleDescription, BundleError};

/// Writes a [`BundleDescription`] as a complete binary container.
///
/// Implementations must be deterministic: the same description always
/// produces the same bytes. From the caller's side a write is all or
/// nothing; any error means the sink contents must be discarded.
pub trait BundleSerializer: Send + Sync {
    /// Serialize `bundle` into `sink`.
    fn serialize(&self, bundle: &BundleDescription<'_>, sink: &mut dyn Write)
        -> Result<(), BundleError>;

    /// Human-readable serializer name for logs.
    fn name(&self) -> &str;
}
