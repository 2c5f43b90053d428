//! The [`TextureEncoder`] trait and helpers shared by block encoders.

use image::RgbaImage;

use crate::texture::{TextureError, TextureFormat};

/// Side length of a compression block in pixels.
pub const BLOCK_DIM: u32 = 4;

/// Largest supported side length of an encoded texture.
pub const MAX_DIMENSION: u32 = 4096;

/// Trait for texture encoding strategies.
///
/// Implementations turn a square RGBA image into a complete texture file
/// (header included). Encoding must be deterministic: identical input gives
/// identical bytes. Implementations must be thread-safe so both variants can
/// be encoded concurrently.
pub trait TextureEncoder: Send + Sync {
    /// Encode an image to a complete texture file.
    ///
    /// # Errors
    ///
    /// Returns `TextureError` if the dimensions are unsupported or the
    /// compressor fails. Never returns an empty buffer on success.
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, TextureError>;

    /// Expected size in bytes of the encoded output for the given dimensions.
    fn expected_size(&self, width: u32, height: u32) -> usize;

    /// File extension of the produced container, without the dot.
    fn extension(&self) -> &str;

    /// Human-readable encoder name for logs and diagnostics.
    fn name(&self) -> &str;

    /// GPU pixel format of the encoded data.
    fn texture_format(&self) -> TextureFormat;
}

/// Check that an image can be fed to a 4×4 block encoder as a base level.
pub fn validate_base_level(image: &RgbaImage) -> Result<(), TextureError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::dimensions(width, height, "image is empty"));
    }
    if width != height {
        return Err(TextureError::dimensions(width, height, "must be square"));
    }
    if width > MAX_DIMENSION {
        return Err(TextureError::dimensions(
            width,
            height,
            format!("must be at most {}", MAX_DIMENSION),
        ));
    }
    if width % BLOCK_DIM != 0 {
        return Err(TextureError::dimensions(
            width,
            height,
            format!("must be a multiple of {}", BLOCK_DIM),
        ));
    }
    Ok(())
}

/// Number of mip levels in a full chain down to 1×1.
pub fn full_mip_count(size: u32) -> usize {
    if size == 0 {
        return 0;
    }
    (u32::BITS - size.leading_zeros()) as usize
}

/// Total compressed size of a mip chain.
///
/// Each level is rounded up to whole 4×4 blocks.
pub fn mip_chain_data_size(width: u32, height: u32, block_size: usize, mipmap_count: usize) -> usize {
    let mut total_size = 0;
    let mut w = width;
    let mut h = height;

    for _ in 0..mipmap_count {
        let blocks_wide = w.div_ceil(BLOCK_DIM) as usize;
        let blocks_high = h.div_ceil(BLOCK_DIM) as usize;
        total_size += blocks_wide * blocks_high * block_size;

        w = (w / 2).max(1);
        h = (h / 2).max(1);
    }

    total_size
}
