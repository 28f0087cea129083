//! Pixel buffers and colour packing.
//!
//! `PixelBuffer` owns a row-major, top-to-bottom array of packed
//! `0x00RRGGBB` colour values. Target buffers (captures) and reference
//! buffers (decoded images) share this layout, and so does the transparency
//! key; the comparator relies on all three agreeing channel for channel.
//! Buffers are immutable after construction, so they can be shared across
//! worker threads by reference.

use crate::util::{SearchError, SearchResult};

#[cfg(feature = "image-io")]
pub mod io;
pub mod resize;

/// Packed 32-bit colour: `0x00RRGGBB`.
pub type ColorValue = u32;

/// Packs three channels into a [`ColorValue`] with a zero high byte.
#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> ColorValue {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Splits a [`ColorValue`] into its `(r, g, b)` channels, ignoring the high byte.
#[inline]
pub const fn channels(color: ColorValue) -> (u8, u8, u8) {
    (
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

/// Owned, immutable image in packed colour format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<ColorValue>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    /// Creates a buffer, checking `pixels.len() == width * height`.
    ///
    /// Zero-sized buffers are allowed; they never match anything.
    pub fn new(pixels: Vec<ColorValue>, width: usize, height: usize) -> SearchResult<Self> {
        let expected = width
            .checked_mul(height)
            .ok_or(SearchError::InvalidDimensions { width, height })?;
        if pixels.len() != expected {
            return Err(SearchError::BufferSizeMismatch {
                expected,
                got: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Creates a buffer filled with a single colour.
    pub fn filled(width: usize, height: usize, color: ColorValue) -> SearchResult<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(SearchError::InvalidDimensions { width, height })?;
        Self::new(vec![color; len], width, height)
    }

    /// Creates a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> SearchResult<Self>
    where
        F: FnMut(usize, usize) -> ColorValue,
    {
        let len = width
            .checked_mul(height)
            .ok_or(SearchError::InvalidDimensions { width, height })?;
        let mut pixels = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(pixels, width, height)
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the backing row-major pixel slice.
    pub fn pixels(&self) -> &[ColorValue] {
        &self.pixels
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<ColorValue> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Returns row `y` as a slice of length `width`.
    ///
    /// Returns `None` when `y` is out of bounds or the buffer is empty, so a
    /// zero-width buffer has no rows.
    pub fn row(&self, y: usize) -> Option<&[ColorValue]> {
        if y >= self.height || self.is_empty() {
            return None;
        }
        let start = y.checked_mul(self.width)?;
        self.pixels.get(start..start + self.width)
    }

    /// Copies a sub-rectangle into a new buffer.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> SearchResult<Self> {
        let end_x = x.checked_add(width);
        let end_y = y.checked_add(height);
        match (end_x, end_y) {
            (Some(ex), Some(ey)) if ex <= self.width && ey <= self.height => {}
            _ => return Err(SearchError::InvalidDimensions { width, height }),
        }

        let mut pixels = Vec::with_capacity(width * height);
        for row in y..y + height {
            let start = row * self.width + x;
            pixels.extend_from_slice(&self.pixels[start..start + width]);
        }
        Self::new(pixels, width, height)
    }

    /// Returns a copy with `patch` written at `(x, y)`, clipped to bounds.
    pub fn with_patch(&self, patch: &PixelBuffer, x: usize, y: usize) -> Self {
        let mut pixels = self.pixels.clone();
        for py in 0..patch.height {
            let ty = y + py;
            if ty >= self.height {
                break;
            }
            for px in 0..patch.width {
                let tx = x + px;
                if tx >= self.width {
                    break;
                }
                pixels[ty * self.width + tx] = patch.pixels[py * patch.width + px];
            }
        }
        Self {
            pixels,
            width: self.width,
            height: self.height,
        }
    }

    /// Consumes the buffer and returns its pixel vector.
    pub fn into_pixels(self) -> Vec<ColorValue> {
        self.pixels
    }
}
