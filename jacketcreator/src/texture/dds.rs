//! DDS texture encoder implementation.
//!
//! Provides a `TextureEncoder` implementation that encodes RGBA images
//! to DirectDraw Surface (DDS) format with BC1/BC3 compression.

use image::RgbaImage;
use intel_tex_2::{bc1, bc3, RgbaSurface};

use crate::texture::encoder::{full_mip_count, mip_chain_data_size, validate_base_level};
use crate::texture::resize::{mip_chain, pad_to_blocks, ResizeFilter};
use crate::texture::{TextureEncoder, TextureError, TextureFormat};

/// Size of the magic plus `DDS_HEADER` structure.
pub const DDS_HEADER_SIZE: usize = 128;

const DDSD_CAPS: u32 = 0x1;
const DDSD_HEIGHT: u32 = 0x2;
const DDSD_WIDTH: u32 = 0x4;
const DDSD_PIXELFORMAT: u32 = 0x1000;
const DDSD_MIPMAPCOUNT: u32 = 0x20000;
const DDSD_LINEARSIZE: u32 = 0x80000;
const DDPF_FOURCC: u32 = 0x4;
const DDSCAPS_COMPLEX: u32 = 0x8;
const DDSCAPS_TEXTURE: u32 = 0x1000;
const DDSCAPS_MIPMAP: u32 = 0x400000;

/// Block compression used inside the DDS container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdsFormat {
    /// BC1/DXT1, opaque or 1-bit alpha.
    BC1,
    /// BC3/DXT5, full alpha channel.
    BC3,
}

impl DdsFormat {
    fn four_cc(self) -> &'static [u8; 4] {
        match self {
            DdsFormat::BC1 => b"DXT1",
            DdsFormat::BC3 => b"DXT5",
        }
    }

    fn texture_format(self) -> TextureFormat {
        match self {
            DdsFormat::BC1 => TextureFormat::Dxt1,
            DdsFormat::BC3 => TextureFormat::Dxt5,
        }
    }
}

/// The fields of a `DDS_HEADER` that vary between textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdsHeader {
    pub width: u32,
    pub height: u32,
    pub mipmap_count: u32,
    pub linear_size: u32,
    pub format: DdsFormat,
}

impl DdsHeader {
    /// Serialize the magic and header (always [`DDS_HEADER_SIZE`] bytes).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut flags = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT | DDSD_LINEARSIZE;
        let mut caps = DDSCAPS_TEXTURE;
        if self.mipmap_count > 1 {
            flags |= DDSD_MIPMAPCOUNT;
            caps |= DDSCAPS_COMPLEX | DDSCAPS_MIPMAP;
        }

        let mut out = Vec::with_capacity(DDS_HEADER_SIZE);
        out.extend_from_slice(b"DDS ");
        for value in [
            124,
            flags,
            self.height,
            self.width,
            self.linear_size,
            0,
            self.mipmap_count,
        ] {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&[0u8; 44]);

        // DDS_PIXELFORMAT
        out.extend_from_slice(&32u32.to_le_bytes());
        out.extend_from_slice(&DDPF_FOURCC.to_le_bytes());
        out.extend_from_slice(self.format.four_cc());
        out.extend_from_slice(&[0u8; 20]);

        for value in [caps, 0, 0, 0, 0] {
            out.extend_from_slice(&value.to_le_bytes());
        }

        debug_assert_eq!(out.len(), DDS_HEADER_SIZE);
        out
    }
}

/// DDS texture encoder.
///
/// Encodes square RGBA images to DDS format with configurable compression
/// and mipmap generation.
///
/// # Example
///
/// ```
/// use jacketcreator::texture::{DdsFormat, DdsTextureEncoder, TextureEncoder};
///
/// let encoder = DdsTextureEncoder::new(DdsFormat::BC1).with_mipmap_count(1);
///
/// assert_eq!(encoder.extension(), "dds");
/// assert_eq!(encoder.name(), "DDS BC1");
/// ```
#[derive(Debug, Clone)]
pub struct DdsTextureEncoder {
    format: DdsFormat,
    mipmap_count: usize,
    filter: ResizeFilter,
}

impl DdsTextureEncoder {
    /// Create a new DDS encoder with the specified compression format.
    ///
    /// By default only the base level is written.
    pub fn new(format: DdsFormat) -> Self {
        Self {
            format,
            mipmap_count: 1,
            filter: ResizeFilter::Triangle,
        }
    }

    /// Set the number of mipmap levels to generate (including the base).
    ///
    /// The count is clamped to the full chain for the encoded size.
    pub fn with_mipmap_count(mut self, count: usize) -> Self {
        self.mipmap_count = count;
        self
    }

    /// Set the filter used to downsample mip levels.
    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Get the compression format.
    pub fn format(&self) -> DdsFormat {
        self.format
    }

    /// Get the configured mipmap count.
    pub fn mipmap_count(&self) -> usize {
        self.mipmap_count
    }

    fn effective_mip_count(&self, size: u32) -> usize {
        self.mipmap_count.clamp(1, full_mip_count(size).max(1))
    }

    fn compress(&self, level: &RgbaImage) -> Vec<u8> {
        let padded = pad_to_blocks(level);
        let surface = RgbaSurface {
            data: padded.as_raw(),
            width: padded.width(),
            height: padded.height(),
            stride: padded.width() * 4,
        };
        match self.format {
            DdsFormat::BC1 => bc1::compress_blocks(&surface),
            DdsFormat::BC3 => bc3::compress_blocks(&surface),
        }
    }
}

impl TextureEncoder for DdsTextureEncoder {
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, TextureError> {
        validate_base_level(image)?;
        let (width, height) = image.dimensions();
        let mip_count = self.effective_mip_count(width);
        let block_size = self.format.texture_format().block_size();

        let header = DdsHeader {
            width,
            height,
            mipmap_count: mip_count as u32,
            linear_size: mip_chain_data_size(width, height, block_size, 1) as u32,
            format: self.format,
        };

        let mut data = header.to_bytes();
        data.reserve(mip_chain_data_size(width, height, block_size, mip_count));
        for level in mip_chain(image, mip_count, self.filter) {
            data.extend_from_slice(&self.compress(&level));
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
        let block_size = self.format.texture_format().block_size();
        DDS_HEADER_SIZE + mip_chain_data_size(width, height, block_size, mip_count)
    }

    fn extension(&self) -> &str {
        "dds"
    }

    fn name(&self) -> &str {
        match self.format {
            DdsFormat::BC1 => "DDS BC1",
            DdsFormat::BC3 => "DDS BC3",
        }
    }

    fn texture_format(&self) -> TextureFormat {
        self.format.texture_format()
    }
}
