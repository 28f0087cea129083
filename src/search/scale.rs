//! Multiplicative scale sweep over one reference image.
//!
//! The sweep walks `min, min + step, ...` by floating accumulation and stops
//! once the accumulated scale exceeds `max` by more than half a step, so the
//! closed upper bound survives rounding drift.

use crate::image::PixelBuffer;
use crate::search::scan::scan;
use crate::search::{Match, SearchContext};
use crate::source::Resizer;
use crate::trace::{trace_event, trace_skip, trace_span};
use crate::util::math::scaled_dim;

/// Closed interval of scale factors with a fixed step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleRange {
    min: f32,
    max: f32,
    step: f32,
}

impl ScaleRange {
    /// Creates a range; callers are expected to pass normalized bounds.
    pub fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// A range containing only `1.0`.
    pub fn identity() -> Self {
        Self::new(1.0, 1.0, 0.1)
    }

    /// Returns the lower bound.
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Returns the upper bound.
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Returns the step.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Iterates the scale factors in ascending order.
    pub fn iter(&self) -> ScaleIter {
        ScaleIter {
            next: self.min,
            limit: self.max + self.step * 0.5,
            step: self.step,
            done: !(self.step > 0.0) || !self.min.is_finite(),
        }
    }
}

impl IntoIterator for ScaleRange {
    type Item = f32;
    type IntoIter = ScaleIter;

    fn into_iter(self) -> ScaleIter {
        self.iter()
    }
}

/// Iterator over the factors of a [`ScaleRange`].
#[derive(Clone, Debug)]
pub struct ScaleIter {
    next: f32,
    limit: f32,
    step: f32,
    done: bool,
}

impl Iterator for ScaleIter {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.done || self.next > self.limit {
            return None;
        }
        let current = self.next;
        let advanced = current + self.step;
        // Stop instead of spinning when the step is lost to precision.
        if advanced <= current {
            self.done = true;
        }
        self.next = advanced;
        Some(current)
    }
}

/// Searches for `reference` at every scale of `ctx.scales`.
///
/// Scale 1.0 (or any factor within a thousandth of a step of it, since the
/// accumulated factor rarely lands on 1.0 exactly) scans the unscaled
/// reference. Other scales ask `resizer` for a copy
/// with each dimension rounded to the nearest integer; zero-sized results and
/// resize failures skip that scale. Unless `ctx.find_all` is set, the sweep
/// stops after the first scale that produced a match.
pub fn search_across_scales<R: Resizer + ?Sized>(
    ctx: &SearchContext<'_>,
    reference: &PixelBuffer,
    resizer: &R,
) -> Vec<Match> {
    let _span = trace_span!(
        "scale_sweep",
        min = ctx.scales.min(),
        max = ctx.scales.max(),
        step = ctx.scales.step()
    )
    .entered();

    let mut matches = Vec::new();
    for scale in ctx.scales {
        let found = if is_unit_scale(scale, ctx.scales.step()) {
            scan(
                ctx.target,
                reference,
                ctx.origin,
                ctx.params,
                ctx.find_all,
                ctx.strategy,
            )
        } else {
            let width = scaled_dim(reference.width(), scale);
            let height = scaled_dim(reference.height(), scale);
            if width == 0 || height == 0 {
                trace_skip!("scale_degenerate", scale = scale, width = width, height = height);
                continue;
            }
            let scaled = match resizer.resize(reference, width, height) {
                Ok(scaled) => scaled,
                Err(err) => {
                    trace_skip!("scale_resize_failed", scale = scale, code = err.code());
                    continue;
                }
            };
            scan(
                ctx.target,
                &scaled,
                ctx.origin,
                ctx.params,
                ctx.find_all,
                ctx.strategy,
            )
        };

        let hit = !found.is_empty();
        matches.extend(found);
        if hit && !ctx.find_all {
            trace_event!("scale_hit", scale = scale);
            break;
        }
    }
    matches
}

/// Returns true when `scale` is 1.0 up to accumulation drift.
#[inline]
fn is_unit_scale(scale: f32, step: f32) -> bool {
    (scale - 1.0).abs() <= step * 1e-3
}
