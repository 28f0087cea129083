//! Collaborator seams: screen capture, reference loading, and resizing.
//!
//! The search core never talks to the OS or to file decoders directly. It
//! consumes these traits, which keeps the kernel testable with in-memory
//! buffers and lets hosts plug in their own capture backends.

use std::collections::HashMap;

use crate::image::PixelBuffer;
use crate::request::SearchRect;
use crate::util::{SearchError, SearchResult};

/// Produces the target buffer for a search.
pub trait ScreenSource: Sync {
    /// Returns the full screen extent `(width, height)` used to clamp rectangles.
    fn screen_size(&self) -> (usize, usize);

    /// Captures a normalized, non-empty rectangle into a new buffer.
    fn capture(&self, rect: &SearchRect) -> SearchResult<PixelBuffer>;
}

/// Decodes a reference image from a path.
pub trait ImageLoader: Sync {
    /// Loads the reference at `path`.
    fn load(&self, path: &str) -> SearchResult<PixelBuffer>;
}

/// Resamples a reference buffer to new dimensions.
pub trait Resizer: Sync {
    /// Returns `src` resized to exactly `width x height`.
    fn resize(&self, src: &PixelBuffer, width: usize, height: usize) -> SearchResult<PixelBuffer>;
}

impl<T: ScreenSource + ?Sized> ScreenSource for &T {
    fn screen_size(&self) -> (usize, usize) {
        (**self).screen_size()
    }

    fn capture(&self, rect: &SearchRect) -> SearchResult<PixelBuffer> {
        (**self).capture(rect)
    }
}

impl<T: ImageLoader + ?Sized> ImageLoader for &T {
    fn load(&self, path: &str) -> SearchResult<PixelBuffer> {
        (**self).load(path)
    }
}

impl<T: Resizer + ?Sized> Resizer for &T {
    fn resize(&self, src: &PixelBuffer, width: usize, height: usize) -> SearchResult<PixelBuffer> {
        (**self).resize(src, width, height)
    }
}

/// A fixed in-memory image that plays the role of the screen.
///
/// Capturing crops the requested rectangle out of the stored frame.
#[derive(Clone, Debug)]
pub struct BufferScreen {
    frame: PixelBuffer,
}

impl BufferScreen {
    /// Wraps a frame as a screen.
    pub fn new(frame: PixelBuffer) -> Self {
        Self { frame }
    }

    /// Returns the stored frame.
    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }
}

impl ScreenSource for BufferScreen {
    fn screen_size(&self) -> (usize, usize) {
        (self.frame.width(), self.frame.height())
    }

    fn capture(&self, rect: &SearchRect) -> SearchResult<PixelBuffer> {
        if rect.is_empty() || rect.left < 0 || rect.top < 0 {
            return Err(SearchError::InvalidSearchRegion {
                left: rect.left,
                top: rect.top,
                right: rect.right,
                bottom: rect.bottom,
            });
        }
        self.frame
            .crop(
                rect.left as usize,
                rect.top as usize,
                rect.width(),
                rect.height(),
            )
            .map_err(|err| SearchError::CaptureFailed {
                reason: err.to_string(),
            })
    }
}

/// Loader that serves pre-decoded buffers by path.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    images: HashMap<String, PixelBuffer>,
}

impl MemoryLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `buffer` under `path`, replacing any previous entry.
    pub fn insert(&mut self, path: impl Into<String>, buffer: PixelBuffer) {
        self.images.insert(path.into(), buffer);
    }

    /// Builder-style variant of [`MemoryLoader::insert`].
    pub fn with(mut self, path: impl Into<String>, buffer: PixelBuffer) -> Self {
        self.insert(path, buffer);
        self
    }
}

impl ImageLoader for MemoryLoader {
    fn load(&self, path: &str) -> SearchResult<PixelBuffer> {
        if path.is_empty() {
            return Err(SearchError::InvalidPath {
                path: path.to_owned(),
            });
        }
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| SearchError::LoadFailed {
                path: path.to_owned(),
                reason: "not registered".to_owned(),
            })
    }
}
