//! File-backed collaborators built on the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Decoded images are
//! converted to `0x00RRGGBB` with alpha dropped, matching the packing used by
//! every other buffer and by the transparency key.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageError, RgbImage};

use crate::image::{pack_rgb, PixelBuffer};
use crate::source::{ImageLoader, Resizer};
use crate::util::{SearchError, SearchResult};

/// Size a loaded reference is resampled to before searching.
///
/// `0` keeps the decoded size. `-1` derives that dimension from the other one
/// so the aspect ratio is preserved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub width: i32,
    pub height: i32,
}

impl LoadOptions {
    /// Returns the size to resample to, or `None` to keep the image as is.
    pub fn target_size(&self, width: usize, height: usize) -> Option<(usize, usize)> {
        if (self.width == 0 && self.height == 0) || width == 0 || height == 0 {
            return None;
        }
        let mut new_w = i64::from(self.width);
        let mut new_h = i64::from(self.height);
        if self.width == -1 && self.height > 0 {
            new_w = (width as f64 * f64::from(self.height) / height as f64).round() as i64;
        } else if self.height == -1 && self.width > 0 {
            new_h = (height as f64 * f64::from(self.width) / width as f64).round() as i64;
        }
        if new_w <= 0 || new_h <= 0 {
            return None;
        }
        let target = (new_w as usize, new_h as usize);
        (target != (width, height)).then_some(target)
    }
}

/// Converts an RGB image into a packed buffer.
pub fn buffer_from_rgb(img: &RgbImage) -> SearchResult<PixelBuffer> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let pixels = img
        .pixels()
        .map(|p| pack_rgb(p.0[0], p.0[1], p.0[2]))
        .collect();
    PixelBuffer::new(pixels, width, height)
}

/// Converts a decoded image of any colour type into a packed buffer.
pub fn buffer_from_dynamic(img: &image::DynamicImage) -> SearchResult<PixelBuffer> {
    buffer_from_rgb(&img.to_rgb8())
}

fn rgb_from_buffer(buffer: &PixelBuffer) -> SearchResult<RgbImage> {
    let mut raw = Vec::with_capacity(buffer.pixels().len() * 3);
    for &px in buffer.pixels() {
        raw.extend_from_slice(&[(px >> 16) as u8, (px >> 8) as u8, px as u8]);
    }
    RgbImage::from_raw(buffer.width() as u32, buffer.height() as u32, raw).ok_or(
        SearchError::InvalidDimensions {
            width: buffer.width(),
            height: buffer.height(),
        },
    )
}

/// Loads references from disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileLoader {
    options: LoadOptions,
}

impl FileLoader {
    /// Creates a loader that keeps decoded sizes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader that resamples every image per `options`.
    pub fn with_options(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Loads and converts the image at `path`.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> SearchResult<PixelBuffer> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let img = image::open(path).map_err(|err| match err {
            ImageError::Unsupported(_) => SearchError::InvalidPath {
                path: display.clone(),
            },
            other => SearchError::LoadFailed {
                path: display.clone(),
                reason: other.to_string(),
            },
        })?;
        let buffer = buffer_from_dynamic(&img)?;
        match self.options.target_size(buffer.width(), buffer.height()) {
            Some((width, height)) => ImageResizer.resize(&buffer, width, height),
            None => Ok(buffer),
        }
    }
}

impl ImageLoader for FileLoader {
    fn load(&self, path: &str) -> SearchResult<PixelBuffer> {
        if path.is_empty() {
            return Err(SearchError::InvalidPath {
                path: String::new(),
            });
        }
        self.load_path(path)
    }
}

/// Resizer using the `image` crate's triangle filter.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageResizer;

impl Resizer for ImageResizer {
    fn resize(&self, src: &PixelBuffer, width: usize, height: usize) -> SearchResult<PixelBuffer> {
        if width == 0 || height == 0 || src.is_empty() {
            return Err(SearchError::InvalidScale { width, height });
        }
        let dst_w = u32::try_from(width).map_err(|_| SearchError::InvalidScale { width, height })?;
        let dst_h =
            u32::try_from(height).map_err(|_| SearchError::InvalidScale { width, height })?;
        let rgb = rgb_from_buffer(src)?;
        let resized = imageops::resize(&rgb, dst_w, dst_h, FilterType::Triangle);
        buffer_from_rgb(&resized)
    }
}
