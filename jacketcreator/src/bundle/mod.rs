//! Jacket bundle assembly and serialization.
//!
//! A [`BundleDescription`] pairs the two encoded texture variants with the
//! asset identifiers and a [`PlatformTarget`]. It is built by [`assemble`],
//! handed to a [`BundleSerializer`] and then dropped.
//!
//! ```text
//!   small ─┐
//!  medium ─┼─► assemble(…, Android) ─► serializer ─► jacket_<id>_android.unity3d
//!     ids ─┤
//!          └─► assemble(…, iOS)     ─► serializer ─► jacket_<id>_ios.unity3d
//! ```

mod description;
mod error;
mod identifiers;
mod platform;
mod serializer;
mod unityfs;

pub use description::{assemble, BundleDescription};
pub use error::BundleError;
pub use identifiers::{AssetIdentifiers, SongId};
pub use platform::PlatformTarget;
pub use serializer::BundleSerializer;
pub use unityfs::{asset_bundle_path_id, UnityFsSerializer, ASSET_BUNDLE_PATH_ID};
