//! Exhaustive placement scan.
//!
//! Placements are visited row-major (`y` outer, `x` inner), so the first
//! match returned when `find_all` is false is always the smallest `(y, x)`.

use crate::image::PixelBuffer;
use crate::kernel::scalar::ScalarKernel;
use crate::kernel::{Kernel, ScanParams, Strategy, VectorKernel};
use crate::search::Match;
use crate::trace::{trace_event, trace_span};

/// Scans every placement of `reference` over `target`.
///
/// Match coordinates are offset by `origin`. Returns an empty list when the
/// reference is empty or larger than the target in either dimension.
pub fn scan(
    target: &PixelBuffer,
    reference: &PixelBuffer,
    origin: (i32, i32),
    params: ScanParams,
    find_all: bool,
    strategy: Strategy,
) -> Vec<Match> {
    match strategy {
        Strategy::Scalar => scan_with::<ScalarKernel>(target, reference, origin, params, find_all),
        Strategy::Vector => scan_with::<VectorKernel>(target, reference, origin, params, find_all),
    }
}

/// Scans with a fixed kernel type.
pub fn scan_with<K: Kernel>(
    target: &PixelBuffer,
    reference: &PixelBuffer,
    origin: (i32, i32),
    params: ScanParams,
    find_all: bool,
) -> Vec<Match> {
    let img_width = target.width();
    let img_height = target.height();
    let ref_width = reference.width();
    let ref_height = reference.height();

    if reference.is_empty() || img_width < ref_width || img_height < ref_height {
        return Vec::new();
    }

    let _span = trace_span!("scan", width = ref_width, height = ref_height).entered();

    let max_x = img_width - ref_width;
    let max_y = img_height - ref_height;
    let (origin_x, origin_y) = origin;
    let w = ref_width as i32;
    let h = ref_height as i32;

    let mut out = Vec::new();
    for y in 0..=max_y {
        for x in 0..=max_x {
            if !K::matches_at(target, reference, x, y, params) {
                continue;
            }
            out.push(Match {
                x: origin_x + x as i32,
                y: origin_y + y as i32,
                w,
                h,
            });
            if !find_all {
                trace_event!("scan_matches", count = 1usize);
                return out;
            }
        }
    }

    trace_event!("scan_matches", count = out.len());
    out
}
