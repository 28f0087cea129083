//! Scalar reference kernel.

use crate::image::{channels, ColorValue, PixelBuffer};
use crate::kernel::{Kernel, ScanParams};
use crate::util::math::abs_diff_u8;

/// Scalar comparator; the behaviour every other kernel must reproduce.
pub struct ScalarKernel;

/// Returns true when every channel of `src` is within `tolerance` of `dst`.
#[inline]
pub fn pixel_within(src: ColorValue, dst: ColorValue, tolerance: u8) -> bool {
    let (sr, sg, sb) = channels(src);
    let (dr, dg, db) = channels(dst);
    abs_diff_u8(sr, dr) <= tolerance
        && abs_diff_u8(sg, dg) <= tolerance
        && abs_diff_u8(sb, db) <= tolerance
}

/// Compares one row segment pixel by pixel.
#[inline]
pub(crate) fn row_matches(ref_row: &[ColorValue], tgt_row: &[ColorValue], params: ScanParams) -> bool {
    for (&src, &dst) in ref_row.iter().zip(tgt_row) {
        if params.transparent == Some(src) {
            continue;
        }
        if !pixel_within(src, dst, params.tolerance) {
            return false;
        }
    }
    true
}

impl Kernel for ScalarKernel {
    fn matches_at(
        target: &PixelBuffer,
        reference: &PixelBuffer,
        x: usize,
        y: usize,
        params: ScanParams,
    ) -> bool {
        let ref_width = reference.width();
        let tgt_width = target.width();
        let ref_pixels = reference.pixels();
        let tgt_pixels = target.pixels();
        debug_assert!(x + ref_width <= tgt_width);
        debug_assert!(y + reference.height() <= target.height());

        for ty in 0..reference.height() {
            let ref_row = &ref_pixels[ty * ref_width..(ty + 1) * ref_width];
            let start = (y + ty) * tgt_width + x;
            let tgt_row = &tgt_pixels[start..start + ref_width];
            if !row_matches(ref_row, tgt_row, params) {
                return false;
            }
        }
        true
    }
}
