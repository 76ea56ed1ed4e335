//! Icon pixel-format conversions
//!
//! The desktop-icon convention wants three representations of the same RGBA
//! input: a BGRA pixel buffer for the icon pixmap, a 1-bit transparency mask
//! (bit set where alpha is nonzero), and a width/height-prefixed ARGB word
//! array for the icon property. All three are built here as pure data; the
//! platform binding applies them.

use thiserror::Error;

use crate::foundation::math::Vector2u;

/// Icon construction errors
#[derive(Error, Debug)]
pub enum IconError {
    /// Pixel buffer length does not match width * height * 4
    #[error("icon pixel buffer has {actual} bytes, expected {expected}")]
    PixelCountMismatch {
        /// Bytes required for the given dimensions
        expected: usize,
        /// Bytes actually supplied
        actual: usize,
    },
}

/// Result type for icon construction
pub type IconResult<T> = Result<T, IconError>;

/// Prepared icon data in every format the native convention requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeIcon {
    /// Icon dimensions
    pub size: Vector2u,
    /// Pixels with red and blue swapped, for the icon pixmap
    pub bgra: Vec<u8>,
    /// 1-bit transparency mask, one row pitch of `(width + 7) / 8` bytes
    pub mask: Vec<u8>,
    /// Width, height, then one ARGB word per pixel, for the icon property
    pub property_words: Vec<u32>,
}

impl NativeIcon {
    /// Build every native representation from an RGBA8 pixel buffer
    pub fn from_rgba(width: u32, height: u32, pixels: &[u8]) -> IconResult<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(IconError::PixelCountMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            size: Vector2u::new(width, height),
            bgra: bgra_pixels(pixels),
            mask: alpha_mask(width, height, pixels),
            property_words: property_words(width, height, pixels),
        })
    }
}

/// Swap red and blue channels, keeping the byte layout otherwise intact
fn bgra_pixels(pixels: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len());
    for rgba in pixels.chunks_exact(4) {
        out.push(rgba[2]);
        out.push(rgba[1]);
        out.push(rgba[0]);
        out.push(rgba[3]);
    }
    out
}

/// Build the 1-bit mask: bit k of a row byte covers pixel `i * 8 + k`,
/// set exactly when that pixel's alpha is nonzero.
fn alpha_mask(width: u32, height: u32, pixels: &[u8]) -> Vec<u8> {
    let width = width as usize;
    let height = height as usize;
    let pitch = (width + 7) / 8;
    let mut mask = vec![0u8; pitch * height];

    for j in 0..height {
        for i in 0..pitch {
            for k in 0..8 {
                let x = i * 8 + k;
                if x < width {
                    let alpha = pixels[(x + j * width) * 4 + 3];
                    if alpha > 0 {
                        mask[i + j * pitch] |= 1 << k;
                    }
                }
            }
        }
    }

    mask
}

/// Build the property word array: width and height first, then one
/// `a << 24 | r << 16 | g << 8 | b` word per pixel.
fn property_words(width: u32, height: u32, pixels: &[u8]) -> Vec<u32> {
    let mut words = Vec::with_capacity(2 + width as usize * height as usize);
    words.push(width);
    words.push(height);

    for rgba in pixels.chunks_exact(4) {
        let (r, g, b, a) = (
            u32::from(rgba[0]),
            u32::from(rgba[1]),
            u32::from(rgba[2]),
            u32::from(rgba[3]),
        );
        words.push(b | (g << 8) | (r << 16) | (a << 24));
    }

    words
}
