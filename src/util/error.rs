//! Error types for imgsearch.
//!
//! Every variant carries a stable negative status code. Hosts that consume
//! the wire format see errors as `"{code}[message]"`.

use thiserror::Error;

/// Result alias for imgsearch operations.
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while preparing or running a search.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The reference path is empty or names an unsupported format.
    #[error("invalid reference path: {path}")]
    InvalidPath { path: String },
    /// The reference image could not be read or decoded.
    #[error("failed to load {path}: {reason}")]
    LoadFailed { path: String, reason: String },
    /// The screen device could not be opened.
    #[error("failed to get screen device context")]
    DeviceContext,
    /// A compatible capture context could not be created.
    #[error("failed to create a compatible device context")]
    CompatibleContext,
    /// The capture buffer could not be allocated.
    #[error("failed to create capture buffer of {width}x{height}")]
    BufferCreation { width: usize, height: usize },
    /// The capture buffer could not be bound to the capture context.
    #[error("failed to select capture buffer")]
    SelectBuffer,
    /// Copying the screen region into the capture buffer failed.
    #[error("screen capture failed: {reason}")]
    CaptureFailed { reason: String },
    /// Pixel data could not be extracted from a captured or loaded image.
    #[error("failed to extract pixel data")]
    PixelExtraction,
    /// The search rectangle is empty after clamping.
    #[error("invalid search region ({left},{top},{right},{bottom})")]
    InvalidSearchRegion {
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    },
    /// Resizing a reference produced an unusable buffer.
    #[error("scaling produced an invalid size {width}x{height}")]
    InvalidScale { width: usize, height: usize },
    /// The formatted result does not fit the configured output limit.
    #[error("result of {len} bytes exceeds the {limit} byte output limit")]
    OutputTooLarge { len: usize, limit: usize },
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The pixel slice length does not equal `width * height`.
    #[error("buffer holds {got} pixels, expected {expected}")]
    BufferSizeMismatch { expected: usize, got: usize },
}

impl SearchError {
    /// Returns the negative status code used on the wire.
    pub fn code(&self) -> i32 {
        match self {
            SearchError::InvalidPath { .. } => -1,
            SearchError::LoadFailed { .. } => -2,
            SearchError::DeviceContext => -3,
            SearchError::CompatibleContext => -4,
            SearchError::BufferCreation { .. } => -5,
            SearchError::SelectBuffer => -6,
            SearchError::CaptureFailed { .. } => -7,
            SearchError::PixelExtraction
            | SearchError::InvalidDimensions { .. }
            | SearchError::BufferSizeMismatch { .. } => -8,
            SearchError::InvalidSearchRegion { .. } => -9,
            SearchError::InvalidScale { .. } => -10,
            SearchError::OutputTooLarge { .. } => -11,
        }
    }

    /// Returns the fixed host-facing message for this error's code.
    pub fn message(&self) -> &'static str {
        message_for_code(self.code())
    }
}

/// Maps a status code to its fixed message.
pub fn message_for_code(code: i32) -> &'static str {
    match code {
        -1 => "Invalid path or image format",
        -2 => "Failed to load image from file",
        -3 => "Failed to get screen device context",
        -4 => "Failed to create a compatible device context",
        -5 => "Failed to create a compatible bitmap",
        -6 => "Failed to select bitmap into device context",
        -7 => "BitBlt (screen capture) failed",
        -8 => "Failed to get bitmap bits (pixel data)",
        -9 => "Invalid search region specified",
        -10 => "Scaling produced an invalid bitmap size",
        -11 => "Result exceeds the output buffer",
        _ => "Unknown error",
    }
}
