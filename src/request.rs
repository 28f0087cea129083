//! Search requests and rectangle normalization.

use crate::search::dispatch::split_reference_paths;
use crate::search::SearchConfig;
use crate::util::{SearchError, SearchResult};

/// Search rectangle in screen coordinates, right/bottom exclusive.
///
/// A right or bottom edge of zero or less means "to the screen edge".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SearchRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl SearchRect {
    /// Creates a rectangle from its edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The whole screen.
    pub const fn full() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Width in pixels, 0 when degenerate.
    pub fn width(&self) -> usize {
        (i64::from(self.right) - i64::from(self.left)).max(0) as usize
    }

    /// Height in pixels, 0 when degenerate.
    pub fn height(&self) -> usize {
        (i64::from(self.bottom) - i64::from(self.top)).max(0) as usize
    }

    /// Returns true when the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Clamps the rectangle to a `screen_width x screen_height` screen.
    ///
    /// Negative left/top become 0; right/bottom that are non-positive or past
    /// the screen edge become the edge. An empty result is an error.
    pub fn clamp_to(&self, screen_width: usize, screen_height: usize) -> SearchResult<Self> {
        let sw = i32::try_from(screen_width).unwrap_or(i32::MAX);
        let sh = i32::try_from(screen_height).unwrap_or(i32::MAX);
        let left = self.left.max(0);
        let top = self.top.max(0);
        let right = if self.right <= 0 || self.right > sw {
            sw
        } else {
            self.right
        };
        let bottom = if self.bottom <= 0 || self.bottom > sh {
            sh
        } else {
            self.bottom
        };
        let rect = Self::new(left, top, right, bottom);
        if rect.is_empty() {
            return Err(SearchError::InvalidSearchRegion {
                left,
                top,
                right,
                bottom,
            });
        }
        Ok(rect)
    }
}

/// One search invocation: references, region, and knobs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchRequest {
    /// `|`-separated reference paths.
    pub references: String,
    /// Region of the screen to search.
    pub rect: SearchRect,
    /// Matching configuration.
    pub config: SearchConfig,
}

impl SearchRequest {
    /// Creates a full-screen request with default configuration.
    pub fn new(references: impl Into<String>) -> Self {
        Self {
            references: references.into(),
            rect: SearchRect::full(),
            config: SearchConfig::default(),
        }
    }

    /// Sets the search rectangle.
    pub fn with_rect(mut self, rect: SearchRect) -> Self {
        self.rect = rect;
        self
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the non-empty reference paths in request order.
    pub fn reference_paths(&self) -> Vec<&str> {
        split_reference_paths(&self.references)
    }

    /// Returns a copy with the rectangle clamped and the config normalized.
    pub fn normalized(&self, screen_width: usize, screen_height: usize) -> SearchResult<Self> {
        Ok(Self {
            references: self.references.clone(),
            rect: self.rect.clamp_to(screen_width, screen_height)?,
            config: self.config.normalized(),
        })
    }
}
