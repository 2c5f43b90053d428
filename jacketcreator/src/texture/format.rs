//! Compressed pixel formats produced by the encoders.

use std::fmt;

/// GPU pixel format of an encoded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// ETC1, RGB at 4 bits per pixel (8-byte blocks).
    Etc1Rgb,
    /// BC1/DXT1, RGB(A1) at 4 bits per pixel (8-byte blocks).
    Dxt1,
    /// BC3/DXT5, RGBA at 8 bits per pixel (16-byte blocks).
    Dxt5,
}

impl TextureFormat {
    /// Bytes per 4×4 block.
    pub fn block_size(&self) -> usize {
        match self {
            TextureFormat::Etc1Rgb | TextureFormat::Dxt1 => 8,
            TextureFormat::Dxt5 => 16,
        }
    }

    /// Unity `TextureFormat` enum value for this format.
    pub fn unity_id(&self) -> i32 {
        match self {
            TextureFormat::Dxt1 => 10,
            TextureFormat::Dxt5 => 12,
            TextureFormat::Etc1Rgb => 34,
        }
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextureFormat::Etc1Rgb => "ETC1",
            TextureFormat::Dxt1 => "BC1",
            TextureFormat::Dxt5 => "BC3",
        };
        f.write_str(name)
    }
}
