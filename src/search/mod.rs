//! Search pipeline: scan, scale sweep, and per-reference dispatch.
//!
//! `scan` slides one reference over the target, `scale` repeats the scan
//! across a range of magnifications, and `dispatch` fans the references of a
//! request out over the worker pool and gathers results in request order.

pub mod dispatch;
pub mod scale;
pub mod scan;

use crate::image::{ColorValue, PixelBuffer};
use crate::kernel::{ScanParams, Strategy};
use crate::util::math::positive_or;
use crate::util::SearchError;

pub use scale::ScaleRange;

/// Default per-channel tolerance.
pub const DEFAULT_TOLERANCE: i32 = 10;
/// Default cap on the formatted result length, in bytes.
pub const DEFAULT_MAX_OUTPUT_LEN: usize = 16 * 1024;
/// Smallest accepted scale factor.
pub const MIN_SCALE: f32 = 0.1;
/// Smallest accepted scale step.
pub const MIN_SCALE_STEP: f32 = 0.01;
/// Step used when the requested step is not positive.
pub const DEFAULT_SCALE_STEP: f32 = 0.1;

/// A single match in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Match {
    /// Left edge (or centre when centred).
    pub x: i32,
    /// Top edge (or centre when centred).
    pub y: i32,
    /// Width of the matched reference at its matching scale.
    pub w: i32,
    /// Height of the matched reference at its matching scale.
    pub h: i32,
}

impl Match {
    /// Returns the match moved to its midpoint, truncating odd sizes.
    pub fn centered(self) -> Self {
        Self {
            x: self.x + self.w / 2,
            y: self.y + self.h / 2,
            ..self
        }
    }
}

/// Matches produced by one reference, or by a whole request once merged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Matches in scan order, grouped by reference in request order.
    pub matches: Vec<Match>,
    /// First recoverable error seen (for example a reference that failed to load).
    pub error: Option<SearchError>,
    /// Number of references skipped because of recoverable errors.
    pub skipped: usize,
}

impl SearchOutcome {
    /// Outcome for a reference that produced `matches`.
    pub fn from_matches(matches: Vec<Match>) -> Self {
        Self {
            matches,
            error: None,
            skipped: 0,
        }
    }

    /// Outcome for a reference that was skipped because of `error`.
    pub fn skipped(error: SearchError) -> Self {
        Self {
            matches: Vec::new(),
            error: Some(error),
            skipped: 1,
        }
    }

    /// Concatenates outcomes in iteration order.
    pub fn merge<I: IntoIterator<Item = SearchOutcome>>(outcomes: I) -> Self {
        let mut merged = SearchOutcome::default();
        for outcome in outcomes {
            merged.matches.extend(outcome.matches);
            merged.skipped += outcome.skipped;
            if merged.error.is_none() {
                merged.error = outcome.error;
            }
        }
        merged
    }
}

/// Per-request search configuration.
///
/// Values are taken as given; [`SearchConfig::normalized`] applies the
/// clamping rules before a search runs.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Per-channel tolerance, clamped to `0..=255`.
    pub tolerance: i32,
    /// Transparency key as `0xRRGGBB`, or `None` for no key.
    pub transparent: Option<ColorValue>,
    /// Maximum number of reported matches; 0 means unlimited.
    pub max_results: usize,
    /// Report match centres instead of top-left corners.
    pub center: bool,
    /// Append the debug suffix to the formatted result.
    pub debug: bool,
    /// Smallest scale factor tried.
    pub scale_min: f32,
    /// Largest scale factor tried.
    pub scale_max: f32,
    /// Increment between scale factors.
    pub scale_step: f32,
    /// Report every occurrence instead of the first per reference.
    pub find_all: bool,
    /// Upper bound on the formatted result length; 0 disables the check.
    pub max_output_len: usize,
    /// Search references on the worker pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            transparent: None,
            max_results: 0,
            center: true,
            debug: false,
            scale_min: 1.0,
            scale_max: 1.0,
            scale_step: DEFAULT_SCALE_STEP,
            find_all: false,
            max_output_len: DEFAULT_MAX_OUTPUT_LEN,
            parallel: true,
        }
    }
}

impl SearchConfig {
    /// Returns a copy with tolerance and scale bounds clamped.
    pub fn normalized(&self) -> Self {
        let scale_min = positive_or(self.scale_min, MIN_SCALE, MIN_SCALE);
        let scale_max = if self.scale_max.is_finite() {
            self.scale_max.max(scale_min)
        } else {
            scale_min
        };
        Self {
            tolerance: self.tolerance.clamp(0, 255),
            scale_min,
            scale_max,
            scale_step: positive_or(self.scale_step, DEFAULT_SCALE_STEP, MIN_SCALE_STEP),
            ..self.clone()
        }
    }

    /// Kernel parameters for this configuration.
    pub fn scan_params(&self) -> ScanParams {
        ScanParams {
            tolerance: self.tolerance.clamp(0, 255) as u8,
            transparent: self.transparent,
        }
    }

    /// Scale sweep for this configuration.
    pub fn scale_range(&self) -> ScaleRange {
        ScaleRange::new(self.scale_min, self.scale_max, self.scale_step)
    }
}

/// Read-only state shared by every reference task of one request.
#[derive(Clone, Copy, Debug)]
pub struct SearchContext<'a> {
    /// Captured target buffer.
    pub target: &'a PixelBuffer,
    /// Screen coordinates of the target's top-left pixel.
    pub origin: (i32, i32),
    /// Comparator parameters.
    pub params: ScanParams,
    /// Scale sweep applied to each reference.
    pub scales: ScaleRange,
    /// Keep scanning after the first match.
    pub find_all: bool,
    /// Comparator implementation.
    pub strategy: Strategy,
}
