//! PVR texture encoder implementation.
//!
//! Writes a PVR (version 3) container holding ETC1 compressed data, the
//! format mobile GPUs sample natively. A full mip chain is generated by
//! default.

use image::RgbaImage;
use intel_tex_2::{etc1, RgbaSurface};

use crate::texture::encoder::{full_mip_count, mip_chain_data_size, validate_base_level};
use crate::texture::resize::{mip_chain, pad_to_blocks, ResizeFilter};
use crate::texture::{TextureEncoder, TextureError, TextureFormat};

/// Size of the PVR v3 header with no metadata.
pub const PVR_HEADER_SIZE: usize = 52;

/// `"PVR\x03"` read as a little-endian integer.
const PVR_VERSION: u32 = 0x0352_5650;

/// PVR v3 pixel format identifier for ETC1.
const PVR_PIXEL_FORMAT_ETC1: u64 = 6;

/// PVR v3 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PvrHeader {
    pub width: u32,
    pub height: u32,
    pub mipmap_count: u32,
}

impl PvrHeader {
    /// Serialize the header (always [`PVR_HEADER_SIZE`] bytes).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PVR_HEADER_SIZE);
        out.extend_from_slice(&PVR_VERSION.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // flags
        out.extend_from_slice(&PVR_PIXEL_FORMAT_ETC1.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // linear RGB
        out.extend_from_slice(&0u32.to_le_bytes()); // unsigned byte normalized
        for value in [
            self.height,
            self.width,
            1, // depth
            1, // surfaces
            1, // faces
            self.mipmap_count,
            0, // metadata size
        ] {
            out.extend_from_slice(&value.to_le_bytes());
        }
        debug_assert_eq!(out.len(), PVR_HEADER_SIZE);
        out
    }
}

/// PVR/ETC1 texture encoder.
///
/// # Example
///
/// ```
/// use jacketcreator::texture::{PvrTextureEncoder, TextureEncoder};
///
/// let encoder = PvrTextureEncoder::new();
/// assert_eq!(encoder.extension(), "pvr");
/// // 52-byte header + 32, 16, 8, 4, 2, 1 levels in 8-byte blocks
/// assert_eq!(encoder.expected_size(32, 32), 52 + 87 * 8);
/// ```
#[derive(Debug, Clone)]
pub struct PvrTextureEncoder {
    mipmap_count: Option<usize>,
    filter: ResizeFilter,
}

impl Default for PvrTextureEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PvrTextureEncoder {
    /// Create an encoder that writes the full mip chain.
    pub fn new() -> Self {
        Self {
            mipmap_count: None,
            filter: ResizeFilter::Triangle,
        }
    }

    /// Limit the number of mip levels (including the base).
    pub fn with_mipmap_count(mut self, count: usize) -> Self {
        self.mipmap_count = Some(count);
        self
    }

    /// Set the filter used to downsample mip levels.
    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Configured level limit, `None` for a full chain.
    pub fn mipmap_count(&self) -> Option<usize> {
        self.mipmap_count
    }

    fn effective_mip_count(&self, size: u32) -> usize {
        let full = full_mip_count(size).max(1);
        self.mipmap_count.map_or(full, |count| count.clamp(1, full))
    }

    fn compress(level: &RgbaImage) -> Vec<u8> {
        let padded = pad_to_blocks(level);
        let surface = RgbaSurface {
            data: padded.as_raw(),
            width: padded.width(),
            height: padded.height(),
            stride: padded.width() * 4,
        };
        etc1::compress_blocks(&etc1::slow_settings(), &surface)
    }
}

impl TextureEncoder for PvrTextureEncoder {
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, TextureError> {
        validate_base_level(image)?;
        let (width, height) = image.dimensions();
        let mip_count = self.effective_mip_count(width);

        let header = PvrHeader {
            width,
            height,
            mipmap_count: mip_count as u32,
        };

        let mut data = header.to_bytes();
        for level in mip_chain(image, mip_count, self.filter) {
            data.extend_from_slice(&Self::compress(&level));
        }

        let expected = self.expected_size(width, height);
        if data.len() != expected {
            return Err(TextureError::EncodingFailed(format!(
                "{} produced {} bytes, expected {}",
                self.name(),
                data.len(),
                expected
            )));
        }

        Ok(data)
    }

    fn expected_size(&self, width: u32, height: u32) -> usize {
        let mip_count = self.effective_mip_count(width.max(height));
        PVR_HEADER_SIZE
            + mip_chain_data_size(
                width,
                height,
                TextureFormat::Etc1Rgb.block_size(),
                mip_count,
            )
    }

    fn extension(&self) -> &str {
        "pvr"
    }

    fn name(&self) -> &str {
        "PVR ETC1"
    }

    fn texture_format(&self) -> TextureFormat {
        TextureFormat::Etc1Rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn read_u32(data: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
    }

    fn gradient(size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| Rgba([(x * 8) as u8, (y * 8) as u8, 64, 255]))
    }

    #[test]
    fn test_header_layout() {
        let bytes = PvrHeader {
            width: 32,
            height: 32,
            mipmap_count: 6,
        }
        .to_bytes();

        assert_eq!(bytes.len(), PVR_HEADER_SIZE);
        assert_eq!(&bytes[0..4], b"PVR\x03");
        assert_eq!(u64::from_le_bytes(bytes[8..16].try_into().unwrap()), 6);
        assert_eq!(read_u32(&bytes, 24), 32);
        assert_eq!(read_u32(&bytes, 28), 32);
        assert_eq!(read_u32(&bytes, 32), 1);
        assert_eq!(read_u32(&bytes, 44), 6);
        assert_eq!(read_u32(&bytes, 48), 0);
    }

    #[test]
    fn test_default_writes_full_chain() {
        let encoder = PvrTextureEncoder::new();
        assert_eq!(encoder.mipmap_count(), None);
        let data = encoder.encode(&gradient(32)).unwrap();
        assert_eq!(read_u32(&data, 44), 6);
        assert_eq!(data.len(), encoder.expected_size(32, 32));
    }

    #[test]
    fn test_full_chain_reaches_one_pixel() {
        let encoder = PvrTextureEncoder::new();
        // 32, 16, 8 and 4 take 64 + 16 + 4 + 1 blocks; 2 and 1 take one padded block each
        assert_eq!(
            encoder.expected_size(32, 32),
            PVR_HEADER_SIZE + (64 + 16 + 4 + 1 + 1 + 1) * 8
        );
        let data = encoder.encode(&gradient(4)).unwrap();
        assert_eq!(read_u32(&data, 44), 3);
        assert_eq!(data.len(), PVR_HEADER_SIZE + 3 * 8);
    }

    #[test]
    fn test_limited_mipmaps() {
        let encoder = PvrTextureEncoder::new().with_mipmap_count(1);
        let data = encoder.encode(&gradient(32)).unwrap();
        assert_eq!(read_u32(&data, 44), 1);
        // 8×8 blocks * 8 bytes
        assert_eq!(data.len(), PVR_HEADER_SIZE + 512);
    }

    #[test]
    fn test_zero_mipmaps_clamps_to_base() {
        let encoder = PvrTextureEncoder::new().with_mipmap_count(0);
        assert_eq!(encoder.expected_size(8, 8), PVR_HEADER_SIZE + 4 * 8);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let encoder = PvrTextureEncoder::new();
        let image = gradient(32);
        assert_eq!(encoder.encode(&image).unwrap(), encoder.encode(&image).unwrap());
    }

    #[test]
    fn test_encode_rejects_unaligned() {
        let encoder = PvrTextureEncoder::new();
        assert!(matches!(
            encoder.encode(&RgbaImage::new(30, 30)),
            Err(TextureError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_metadata() {
        let encoder = PvrTextureEncoder::default();
        assert_eq!(encoder.extension(), "pvr");
        assert_eq!(encoder.name(), "PVR ETC1");
        assert_eq!(encoder.texture_format(), TextureFormat::Etc1Rgb);
    }
}
