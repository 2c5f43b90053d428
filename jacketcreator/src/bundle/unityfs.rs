//! Uncompressed UnityFS-style jacket bundle writer.
//!
//! # Layout
//!
//! ```text
//! UnityFS header (big-endian)
//!   "UnityFS\0", format version, player version, engine version,
//!   total size, blocks-info sizes, flags (0x40: combined, uncompressed)
//! Blocks info
//!   16-byte hash, 1 storage block, 1 node "CAB-<digest>"
//! Serialized file (header big-endian, metadata and objects little-endian)
//!   types:   AssetBundle (142), Texture2D (28)
//!   objects: sorted by path ID
//!     1, 2 or 3    AssetBundle  container of the two textures
//!     pvr_path_id  Texture2D    jacket_<id>_s  (small payload)
//!     dds_path_id  Texture2D    jacket_<id>_m  (medium payload)
//! ```
//!
//! Texture payloads are stored without their PVR/DDS container headers.
//! Nothing time- or host-dependent is written, so identical descriptions
//! produce identical files.

use std::io::Write;

use bytes::{BufMut, BytesMut};
use sha2::{Digest, Sha256};

use crate::bundle::{AssetIdentifiers, BundleDescription, BundleError, BundleSerializer};
use crate::config::BundleConfig;
use crate::texture::{CompressedPayload, VariantKind, DDS_HEADER_SIZE, PVR_HEADER_SIZE};

const SIGNATURE: &[u8] = b"UnityFS\0";
const FORMAT_VERSION: u32 = 6;
const FLAG_BLOCKS_AND_DIRECTORY_COMBINED: u32 = 0x40;
const NODE_FLAG_SERIALIZED_FILE: u32 = 4;

const SERIALIZED_FILE_VERSION: u32 = 17;
const SERIALIZED_HEADER_SIZE: usize = 20;

const CLASS_TEXTURE_2D: i32 = 28;
const CLASS_ASSET_BUNDLE: i32 = 142;

/// Preferred path ID of the AssetBundle object.
pub const ASSET_BUNDLE_PATH_ID: i64 = 1;

/// Path ID for the AssetBundle object: the smallest positive ID not taken
/// by either texture.
pub fn asset_bundle_path_id(ids: &AssetIdentifiers) -> i64 {
    (ASSET_BUNDLE_PATH_ID..)
        .find(|id| *id != ids.pvr_path_id && *id != ids.dds_path_id)
        .unwrap_or(ASSET_BUNDLE_PATH_ID)
}

/// Writes jacket bundles in an uncompressed UnityFS layout.
#[derive(Debug, Clone, Default)]
pub struct UnityFsSerializer {
    config: BundleConfig,
}

impl UnityFsSerializer {
    pub fn new(config: BundleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// Build the complete file in memory.
    pub fn to_bytes(&self, bundle: &BundleDescription<'_>) -> Result<Vec<u8>, BundleError> {
        let serialized = self.serialized_file(bundle)?;
        let node_name = cab_name(bundle);

        let mut blocks_info = BytesMut::new();
        blocks_info.put_slice(&[0u8; 16]);
        blocks_info.put_i32(1);
        blocks_info.put_u32(serialized.len() as u32);
        blocks_info.put_u32(serialized.len() as u32);
        blocks_info.put_u16(0);
        blocks_info.put_i32(1);
        blocks_info.put_i64(0);
        blocks_info.put_i64(serialized.len() as i64);
        blocks_info.put_u32(NODE_FLAG_SERIALIZED_FILE);
        put_cstring(&mut blocks_info, &node_name);

        let header_len = SIGNATURE.len()
            + 4
            + self.config.player_version.len()
            + 1
            + self.config.engine_version.len()
            + 1
            + 8
            + 4 * 3;
        let total = header_len + blocks_info.len() + serialized.len();

        let mut out = BytesMut::with_capacity(total);
        out.put_slice(SIGNATURE);
        out.put_u32(FORMAT_VERSION);
        put_cstring(&mut out, &self.config.player_version);
        put_cstring(&mut out, &self.config.engine_version);
        out.put_i64(total as i64);
        out.put_u32(blocks_info.len() as u32);
        out.put_u32(blocks_info.len() as u32);
        out.put_u32(FLAG_BLOCKS_AND_DIRECTORY_COMBINED);
        debug_assert_eq!(out.len(), header_len);
        out.put_slice(&blocks_info);
        out.put_slice(&serialized);

        Ok(out.to_vec())
    }

    fn serialized_file(&self, bundle: &BundleDescription<'_>) -> Result<Vec<u8>, BundleError> {
        let ids = bundle.ids;
        let song = ids.song_id;

        let mut objects = vec![SerializedObject {
            path_id: asset_bundle_path_id(&ids),
            type_index: 0,
            data: asset_bundle_object(bundle),
        }];
        for kind in VariantKind::ALL {
            let texture = TextureData::from_payload(bundle.payload(kind))?;
            objects.push(SerializedObject {
                path_id: ids.path_id(kind),
                type_index: 1,
                data: texture_object(&song.texture_name(kind), &texture),
            });
        }

        objects.sort_by_key(|object| object.path_id);
        if let Some(pair) = objects.windows(2).find(|w| w[0].path_id == w[1].path_id) {
            return Err(BundleError::DuplicatePathId(pair[0].path_id));
        }

        // Object data, each entry 8-byte aligned
        let mut data = BytesMut::new();
        let mut table = Vec::with_capacity(objects.len());
        for object in &objects {
            align(&mut data, 8);
            table.push((object.path_id, data.len() as u32, object.data.len() as u32, object.type_index));
            data.put_slice(&object.data);
        }

        let mut metadata = BytesMut::new();
        put_cstring(&mut metadata, &self.config.engine_version);
        metadata.put_i32_le(bundle.platform.unity_build_target());
        metadata.put_u8(0); // no type trees
        metadata.put_i32_le(2);
        for class_id in [CLASS_ASSET_BUNDLE, CLASS_TEXTURE_2D] {
            metadata.put_i32_le(class_id);
            metadata.put_u8(0); // not stripped
            metadata.put_i16_le(-1); // no script
            metadata.put_slice(&[0u8; 16]);
        }
        metadata.put_i32_le(table.len() as i32);
        for (path_id, start, size, type_index) in table {
            align_from(&mut metadata, SERIALIZED_HEADER_SIZE, 4);
            metadata.put_i64_le(path_id);
            metadata.put_u32_le(start);
            metadata.put_u32_le(size);
            metadata.put_i32_le(type_index);
        }
        metadata.put_i32_le(0); // scripts
        metadata.put_i32_le(0); // externals
        metadata.put_u8(0); // user information

        let data_offset = (SERIALIZED_HEADER_SIZE + metadata.len()).next_multiple_of(16);
        let file_size = data_offset + data.len();

        let mut out = BytesMut::with_capacity(file_size);
        out.put_u32(metadata.len() as u32);
        out.put_u32(file_size as u32);
        out.put_u32(SERIALIZED_FILE_VERSION);
        out.put_u32(data_offset as u32);
        out.put_u8(0); // little-endian objects
        out.put_slice(&[0u8; 3]);
        out.put_slice(&metadata);
        out.resize(data_offset, 0);
        out.put_slice(&data);

        Ok(out.to_vec())
    }
}

impl BundleSerializer for UnityFsSerializer {
    fn serialize(
        &self,
        bundle: &BundleDescription<'_>,
        sink: &mut dyn Write,
    ) -> Result<(), BundleError> {
        let bytes = self.to_bytes(bundle)?;
        sink.write_all(&bytes)?;
        sink.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "UnityFS"
    }
}

struct SerializedObject {
    path_id: i64,
    type_index: i32,
    data: BytesMut,
}

/// Raw texture blocks extracted from an encoded payload.
#[derive(Debug, PartialEq, Eq)]
struct TextureData<'a> {
    dimension: u32,
    format_id: i32,
    mip_count: i32,
    complete_size: usize,
    blocks: &'a [u8],
}

impl<'a> TextureData<'a> {
    fn from_payload(payload: &'a CompressedPayload) -> Result<Self, BundleError> {
        let kind = payload.kind();
        let data = payload.data();
        if data.is_empty() {
            return Err(BundleError::EmptyPayload(kind));
        }

        let malformed = |reason: &str| BundleError::MalformedPayload {
            kind,
            reason: reason.to_string(),
        };

        let (mip_count, blocks) = if data.starts_with(b"PVR\x03") {
            if data.len() < PVR_HEADER_SIZE {
                return Err(malformed("truncated PVR header"));
            }
            let metadata_size = read_u32_le(data, 48) as usize;
            let start = PVR_HEADER_SIZE
                .checked_add(metadata_size)
                .filter(|start| *start <= data.len())
                .ok_or_else(|| malformed("PVR metadata runs past end of payload"))?;
            (read_u32_le(data, 44), &data[start..])
        } else if data.starts_with(b"DDS ") {
            if data.len() < DDS_HEADER_SIZE {
                return Err(malformed("truncated DDS header"));
            }
            (read_u32_le(data, 28).max(1), &data[DDS_HEADER_SIZE..])
        } else {
            (1, data)
        };

        let dimension = payload.dimension();
        let format = payload.format();
        let blocks_per_side = dimension.div_ceil(4) as usize;
        let complete_size = blocks_per_side * blocks_per_side * format.block_size();
        if blocks.len() < complete_size {
            return Err(malformed("texture data is shorter than its base level"));
        }

        Ok(Self {
            dimension,
            format_id: format.unity_id(),
            mip_count: mip_count as i32,
            complete_size,
            blocks,
        })
    }
}

fn cab_name(bundle: &BundleDescription<'_>) -> String {
    let digest = Sha256::digest(
        format!(
            "jacket_{}_{}",
            bundle.ids.song_id,
            bundle.platform.slug()
        )
        .as_bytes(),
    );
    let hex: String = digest[..16].iter().map(|b| format!("{:02x}", b)).collect();
    format!("CAB-{}", hex)
}

fn asset_bundle_object(bundle: &BundleDescription<'_>) -> BytesMut {
    let song = bundle.ids.song_id;
    let bundle_name = bundle.file_name();

    // Container entries are sorted by name
    let mut entries: Vec<(String, i64)> = VariantKind::ALL
        .iter()
        .map(|kind| (song.texture_name(*kind), bundle.ids.path_id(*kind)))
        .collect();
    entries.sort();

    let mut out = BytesMut::new();
    put_aligned_string(&mut out, &bundle_name);

    // Preload table
    out.put_i32_le(entries.len() as i32);
    for (_, path_id) in &entries {
        put_pptr(&mut out, *path_id);
    }

    // Container
    out.put_i32_le(entries.len() as i32);
    for (index, (name, path_id)) in entries.iter().enumerate() {
        put_aligned_string(&mut out, name);
        out.put_i32_le(index as i32);
        out.put_i32_le(1);
        put_pptr(&mut out, *path_id);
    }

    // Main asset: none
    out.put_i32_le(0);
    out.put_i32_le(0);
    put_pptr(&mut out, 0);

    out.put_u32_le(1); // runtime compatibility
    put_aligned_string(&mut out, &bundle_name);
    out.put_i32_le(0); // dependencies
    out.put_u8(0); // not a streamed scene bundle
    align(&mut out, 4);
    out
}

fn texture_object(name: &str, texture: &TextureData<'_>) -> BytesMut {
    let mut out = BytesMut::new();
    put_aligned_string(&mut out, name);
    out.put_i32_le(texture.dimension as i32);
    out.put_i32_le(texture.dimension as i32);
    out.put_i32_le(texture.complete_size as i32);
    out.put_i32_le(texture.format_id);
    out.put_i32_le(texture.mip_count);
    out.put_u8(0); // not readable
    align(&mut out, 4);
    out.put_i32_le(1); // image count
    out.put_i32_le(2); // 2D

    // Texture settings: bilinear, aniso 1, no bias, clamp
    out.put_i32_le(1);
    out.put_i32_le(1);
    out.put_f32_le(0.0);
    out.put_i32_le(1);

    out.put_i32_le(0); // lightmap format
    out.put_i32_le(1); // gamma color space

    out.put_u32_le(texture.blocks.len() as u32);
    out.put_slice(texture.blocks);
    align(&mut out, 4);

    // No streamed data
    out.put_u32_le(0);
    out.put_u32_le(0);
    put_aligned_string(&mut out, "");
    out
}

fn put_cstring(buf: &mut BytesMut, value: &str) {
    buf.put_slice(value.as_bytes());
    buf.put_u8(0);
}

fn put_aligned_string(buf: &mut BytesMut, value: &str) {
    buf.put_i32_le(value.len() as i32);
    buf.put_slice(value.as_bytes());
    align(buf, 4);
}

fn put_pptr(buf: &mut BytesMut, path_id: i64) {
    buf.put_i32_le(0);
    buf.put_i64_le(path_id);
}

fn align(buf: &mut BytesMut, alignment: usize) {
    align_from(buf, 0, alignment);
}

/// Pad so that `base + buf.len()` is a multiple of `alignment`.
fn align_from(buf: &mut BytesMut, base: usize, alignment: usize) {
    let padded = (base + buf.len()).next_multiple_of(alignment) - base;
    buf.resize(padded, 0);
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{assemble, AssetIdentifiers, PlatformTarget, SongId};
    use crate::texture::{PvrHeader, TextureFormat};

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn read_u32_be(data: &[u8], offset: usize) -> u32 {
        u32::from_be_bytes(data[offset..offset + 4].try_into().unwrap())
    }

    fn small_payload() -> CompressedPayload {
        let mut data = PvrHeader {
            width: 8,
            height: 8,
            mipmap_count: 1,
        }
        .to_bytes();
        data.extend_from_slice(&[0x11; 32]);
        CompressedPayload::new(VariantKind::Small, 8, TextureFormat::Etc1Rgb, data).unwrap()
    }

    fn medium_payload() -> CompressedPayload {
        let mut data = vec![0u8; DDS_HEADER_SIZE];
        data[0..4].copy_from_slice(b"DDS ");
        data[28..32].copy_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&[0x22; 8 * 16]);
        CompressedPayload::new(VariantKind::Medium, 16, TextureFormat::Dxt1, data).unwrap()
    }

    fn serialize(platform: PlatformTarget, pvr: i64, dds: i64) -> Result<Vec<u8>, BundleError> {
        let small = small_payload();
        let medium = medium_payload();
        let ids = AssetIdentifiers::new(SongId::normalize(10042), pvr, dds);
        let bundle = assemble(&small, &medium, ids, platform);
        let mut out = Vec::new();
        UnityFsSerializer::default().serialize(&bundle, &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_header() {
        let bytes = serialize(PlatformTarget::Android, 100, 200).unwrap();

        assert!(bytes.starts_with(b"UnityFS\0"));
        assert_eq!(read_u32_be(&bytes, 8), FORMAT_VERSION);
        assert_eq!(&bytes[12..18], b"5.x.x\0");
        assert_eq!(&bytes[18..26], b"5.4.5p1\0");
        let total = i64::from_be_bytes(bytes[26..34].try_into().unwrap());
        assert_eq!(total as usize, bytes.len());
        assert_eq!(read_u32_be(&bytes, 42), FLAG_BLOCKS_AND_DIRECTORY_COMBINED);
    }

    #[test]
    fn test_contains_names_and_texture_blocks() {
        let bytes = serialize(PlatformTarget::Android, 100, 200).unwrap();

        assert!(find(&bytes, b"jacket_42_s").is_some());
        assert!(find(&bytes, b"jacket_42_m").is_some());
        assert!(find(&bytes, b"jacket_42_android.unity3d").is_some());
        assert!(find(&bytes, b"CAB-").is_some());
        assert!(find(&bytes, &[0x11; 32]).is_some());
        assert!(find(&bytes, &[0x22; 128]).is_some());
        // Container headers are stripped
        assert!(find(&bytes, b"PVR\x03").is_none());
        assert!(find(&bytes, b"DDS ").is_none());
    }

    #[test]
    fn test_path_ids_embedded() {
        let bytes = serialize(PlatformTarget::Ios, 0x1234_5678_9ABC, 0x0FED_CBA9).unwrap();
        assert!(find(&bytes, &0x1234_5678_9ABCi64.to_le_bytes()).is_some());
        assert!(find(&bytes, &0x0FED_CBA9i64.to_le_bytes()).is_some());
    }

    #[test]
    fn test_platforms_differ() {
        let android = serialize(PlatformTarget::Android, 100, 200).unwrap();
        let ios = serialize(PlatformTarget::Ios, 100, 200).unwrap();
        assert_ne!(android, ios);
        assert!(find(&ios, b"jacket_42_ios.unity3d").is_some());
    }

    #[test]
    fn test_deterministic() {
        let a = serialize(PlatformTarget::Android, 100, 200).unwrap();
        let b = serialize(PlatformTarget::Android, 100, 200).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cab_name_is_stable() {
        let small = small_payload();
        let medium = medium_payload();
        let ids = AssetIdentifiers::new(SongId::normalize(42), 1, 2);
        let bundle = assemble(&small, &medium, ids, PlatformTarget::Android);

        let name = cab_name(&bundle);
        assert_eq!(name.len(), 4 + 32);
        assert_eq!(name, cab_name(&bundle));
        assert_ne!(
            name,
            cab_name(&assemble(&small, &medium, ids, PlatformTarget::Ios))
        );
    }

    #[test]
    fn test_duplicate_path_ids_rejected() {
        let err = serialize(PlatformTarget::Android, 100, 100).unwrap_err();
        assert!(matches!(err, BundleError::DuplicatePathId(100)));
    }

    #[test]
    fn test_asset_bundle_path_id_avoids_texture_ids() {
        let id = |pvr, dds| {
            asset_bundle_path_id(&AssetIdentifiers::new(SongId::normalize(1), pvr, dds))
        };
        assert_eq!(id(100, 200), 1);
        assert_eq!(id(1, 200), 2);
        assert_eq!(id(2, 1), 3);
        assert_eq!(id(1, 3), 2);
        assert_eq!(id(-1, 0), 1);
    }

    #[test]
    fn test_texture_path_ids_may_use_low_values() {
        let bytes = serialize(PlatformTarget::Android, 1, 2).unwrap();
        assert!(find(&bytes, &1i64.to_le_bytes()).is_some());
        assert!(find(&bytes, &3i64.to_le_bytes()).is_some());
        assert!(bytes.starts_with(b"UnityFS\0"));
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let small = CompressedPayload::new(
            VariantKind::Small,
            8,
            TextureFormat::Etc1Rgb,
            b"PVR\x03short".to_vec(),
        )
        .unwrap();
        let medium = medium_payload();
        let ids = AssetIdentifiers::new(SongId::normalize(1), 100, 200);
        let bundle = assemble(&small, &medium, ids, PlatformTarget::Android);

        let err = UnityFsSerializer::default().to_bytes(&bundle).unwrap_err();
        assert!(matches!(
            err,
            BundleError::MalformedPayload {
                kind: VariantKind::Small,
                ..
            }
        ));
    }

    #[test]
    fn test_raw_payload_kept_as_is() {
        let data = vec![0x33; 8];
        let payload =
            CompressedPayload::new(VariantKind::Medium, 4, TextureFormat::Dxt1, data.clone())
                .unwrap();
        let texture = TextureData::from_payload(&payload).unwrap();
        assert_eq!(texture.blocks, &data[..]);
        assert_eq!(texture.mip_count, 1);
        assert_eq!(texture.complete_size, 8);
        assert_eq!(texture.format_id, 10);
    }

    #[test]
    fn test_write_failure_surfaces_io_error() {
        struct FailingSink;

        impl Write for FailingSink {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let small = small_payload();
        let medium = medium_payload();
        let ids = AssetIdentifiers::new(SongId::normalize(1), 100, 200);
        let bundle = assemble(&small, &medium, ids, PlatformTarget::Android);

        let err = UnityFsSerializer::default()
            .serialize(&bundle, &mut FailingSink)
            .unwrap_err();
        assert!(matches!(err, BundleError::Io(_)));
    }

    #[test]
    fn test_align_from() {
        let mut buf = BytesMut::new();
        buf.put_u8(1);
        align_from(&mut buf, 20, 4);
        assert_eq!(buf.len(), 4);

        let mut buf = BytesMut::new();
        buf.put_slice(&[1, 2, 3]);
        align_from(&mut buf, 2, 4);
        assert_eq!(buf.len(), 6);
    }
}
