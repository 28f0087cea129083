//! Wire formatting of search results.
//!
//! Successful searches render as `{count}[x|y|w|h,...]`, searches without a
//! hit as `{0}[No Match Found]`, and failures as `{code}[message]`. An
//! optional debug suffix follows the payload; it is informational and not
//! meant to be parsed.

use std::fmt::{self, Write as _};

use crate::image::ColorValue;
use crate::request::SearchRect;
use crate::search::{Match, SearchConfig};
use crate::util::SearchError;

/// Payload written when a search finds nothing.
pub const NO_MATCH: &str = "No Match Found";

/// Parameters echoed by the debug suffix.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugInfo<'a> {
    /// Reference path list exactly as requested.
    pub references: &'a str,
    /// Search rectangle after clamping.
    pub rect: SearchRect,
    pub tolerance: i32,
    pub transparent: Option<ColorValue>,
    pub max_results: usize,
    pub center: bool,
    pub find_all: bool,
    /// Whether the vector comparator was used.
    pub vector: bool,
    pub scale_min: f32,
    pub scale_max: f32,
    pub scale_step: f32,
}

impl<'a> DebugInfo<'a> {
    /// Collects debug fields from a normalized request.
    pub fn new(references: &'a str, rect: SearchRect, config: &SearchConfig, vector: bool) -> Self {
        Self {
            references,
            rect,
            tolerance: config.tolerance,
            transparent: config.transparent,
            max_results: config.max_results,
            center: config.center,
            find_all: config.find_all,
            vector,
            scale_min: config.scale_min,
            scale_max: config.scale_max,
            scale_step: config.scale_step,
        }
    }
}

impl fmt::Display for DebugInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let SearchRect {
            left,
            top,
            right,
            bottom,
        } = self.rect;
        write!(
            f,
            " | DEBUG: File={}, Rect=({left},{top},{right},{bottom}), Tol={}, Trans=",
            self.references, self.tolerance
        )?;
        match self.transparent {
            Some(key) => write!(f, "0x{key:X}")?,
            None => f.write_str("0xNONE")?,
        }
        write!(
            f,
            ", Multi={}, Center={}, FindAll={}, SIMD={}, Scale=({:.2},{:.2},{:.2})",
            self.max_results,
            u8::from(self.center),
            u8::from(self.find_all),
            u8::from(self.vector),
            self.scale_min,
            self.scale_max,
            self.scale_step
        )
    }
}

/// Renders matches, truncated to `max_results` when it is non-zero.
///
/// Centering moves each entry to `(x + w/2, y + h/2)` with truncating
/// division; width and height are reported unchanged.
pub fn format_matches(matches: &[Match], max_results: usize, center: bool) -> String {
    let kept = if max_results > 0 {
        &matches[..matches.len().min(max_results)]
    } else {
        matches
    };
    if kept.is_empty() {
        return format!("{{0}}[{NO_MATCH}]");
    }

    let mut out = format!("{{{}}}[", kept.len());
    for (idx, m) in kept.iter().enumerate() {
        let m = if center { m.centered() } else { *m };
        if idx > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}|{}|{}|{}", m.x, m.y, m.w, m.h);
    }
    out.push(']');
    out
}

/// Renders an error as `{code}[message]`.
pub fn format_error(err: &SearchError) -> String {
    format!("{{{}}}[{}]", err.code(), err.message())
}

/// Appends the debug suffix when present and enforces the length limit.
///
/// A `limit` of 0 disables the check.
pub fn finish(mut payload: String, debug: Option<&DebugInfo<'_>>, limit: usize) -> String {
    if let Some(info) = debug {
        let _ = write!(payload, "{info}");
    }
    if limit > 0 && payload.len() > limit {
        return format_error(&SearchError::OutputTooLarge {
            len: payload.len(),
            limit,
        });
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::{finish, format_error, format_matches, DebugInfo};
    use crate::request::SearchRect;
    use crate::search::{Match, SearchConfig};
    use crate::util::SearchError;

    fn m(x: i32, y: i32, w: i32, h: i32) -> Match {
        Match { x, y, w, h }
    }

    #[test]
    fn empty_list_reports_no_match() {
        assert_eq!(format_matches(&[], 0, true), "{0}[No Match Found]");
    }

    #[test]
    fn entries_are_comma_separated() {
        let out = format_matches(&[m(1, 2, 3, 4), m(5, 6, 7, 8)], 0, false);
        assert_eq!(out, "{2}[1|2|3|4,5|6|7|8]");
    }

    #[test]
    fn max_results_truncates_before_counting() {
        let matches = [m(0, 0, 2, 2), m(1, 0, 2, 2), m(2, 0, 2, 2)];
        assert_eq!(format_matches(&matches, 2, false), "{2}[0|0|2|2,1|0|2|2]");
        assert_eq!(format_matches(&matches, 10, false).chars().nth(1), Some('3'));
    }

    #[test]
    fn centering_uses_truncating_halves() {
        assert_eq!(format_matches(&[m(4, 4, 3, 3)], 0, true), "{1}[5|5|3|3]");
    }

    #[test]
    fn error_uses_fixed_message() {
        let err = SearchError::InvalidSearchRegion {
            left: 0,
            top: 0,
            right: 0,
            bottom: 0,
        };
        assert_eq!(format_error(&err), "{-9}[Invalid search region specified]");
    }

    #[test]
    fn debug_suffix_lists_parameters() {
        let config = SearchConfig {
            transparent: Some(0xFF00FF),
            ..SearchConfig::default()
        };
        let info = DebugInfo::new("a.png|b.png", SearchRect::new(0, 0, 10, 10), &config, true);
        let out = finish("{0}[No Match Found]".to_string(), Some(&info), 0);
        assert_eq!(
            out,
            "{0}[No Match Found] | DEBUG: File=a.png|b.png, Rect=(0,0,10,10), Tol=10, \
             Trans=0xFF00FF, Multi=0, Center=1, FindAll=0, SIMD=1, Scale=(1.00,1.00,0.10)"
        );

        let info = DebugInfo::new("a.png", SearchRect::new(0, 0, 1, 1), &SearchConfig::default(), false);
        assert!(info.to_string().contains("Trans=0xNONE"));
    }

    #[test]
    fn oversized_output_becomes_error() {
        let out = finish("{1}[1|2|3|4]".to_string(), None, 5);
        assert_eq!(out, "{-11}[Result exceeds the output buffer]");
        assert_eq!(finish("{1}[1|2|3|4]".to_string(), None, 0), "{1}[1|2|3|4]");
    }
}
