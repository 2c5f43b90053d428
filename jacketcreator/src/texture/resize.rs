//! Deterministic resampling used for texture variants and mip levels.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::texture::encoder::BLOCK_DIM;

/// Resampling filter used when deriving variants.
///
/// Mirrors [`image::imageops::FilterType`] with a stable textual form for
/// configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl ResizeFilter {
    /// All filters in declaration order.
    pub const ALL: [ResizeFilter; 5] = [
        ResizeFilter::Nearest,
        ResizeFilter::Triangle,
        ResizeFilter::CatmullRom,
        ResizeFilter::Gaussian,
        ResizeFilter::Lanczos3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeFilter::Nearest => "nearest",
            ResizeFilter::Triangle => "triangle",
            ResizeFilter::CatmullRom => "catmullrom",
            ResizeFilter::Gaussian => "gaussian",
            ResizeFilter::Lanczos3 => "lanczos3",
        }
    }

    fn filter_type(self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ResizeFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == lower)
            .ok_or_else(|| {
                format!(
                    "unknown resize filter '{}', expected one of: nearest, triangle, catmullrom, gaussian, lanczos3",
                    s
                )
            })
    }
}

/// Resize an image to a `size`×`size` square.
///
/// Non-square input is squashed, never cropped or letterboxed. Input that
/// already has the target dimensions is returned as an exact copy.
pub fn resize_square(image: &RgbaImage, size: u32, filter: ResizeFilter) -> RgbaImage {
    if image.dimensions() == (size, size) {
        return image.clone();
    }
    imageops::resize(image, size, size, filter.filter_type())
}

/// Produce `count` mip levels, starting with `base` itself.
///
/// Each level halves the previous one (minimum 1×1) and is resampled from the
/// base level rather than the previous level.
pub fn mip_chain(base: &RgbaImage, count: usize, filter: ResizeFilter) -> Vec<RgbaImage> {
    let mut levels = Vec::with_capacity(count);
    let (mut w, mut h) = base.dimensions();

    for level in 0..count {
        if level == 0 {
            levels.push(base.clone());
        } else {
            levels.push(imageops::resize(base, w, h, filter.filter_type()));
        }
        w = (w / 2).max(1);
        h = (h / 2).max(1);
    }

    levels
}

/// Pad an image to whole 4×4 blocks by repeating its edge pixels.
pub fn pad_to_blocks(image: &RgbaImage) -> Cow<'_, RgbaImage> {
    let (width, height) = image.dimensions();
    let padded_w = width.div_ceil(BLOCK_DIM) * BLOCK_DIM;
    let padded_h = height.div_ceil(BLOCK_DIM) * BLOCK_DIM;

    if (padded_w, padded_h) == (width, height) {
        return Cow::Borrowed(image);
    }

    Cow::Owned(RgbaImage::from_fn(padded_w, padded_h, |x, y| {
        *image.get_pixel(x.min(width - 1), y.min(height - 1))
    }))
}
