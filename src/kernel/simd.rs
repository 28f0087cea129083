//! SIMD comparator using the `wide` crate.
//!
//! Each step loads 8 reference and 8 target pixels into `i32x8`, splits the
//! three channels with shifts and masks, and tests `|src - dst| > tolerance`
//! lane-wise. Lanes whose reference pixel equals the transparency key are
//! masked out; a block that is entirely transparent is skipped before any
//! target pixels are loaded. Row tails shorter than 8 use the scalar test.

use crate::image::{ColorValue, PixelBuffer};
use crate::kernel::scalar::row_matches;
use crate::kernel::{Kernel, ScanParams};
use wide::i32x8;

const LANES: usize = 8;

/// Load 8 packed pixels as signed lanes (bit pattern preserved).
#[inline]
fn load_u32x8(slice: &[ColorValue]) -> i32x8 {
    i32x8::from([
        slice[0] as i32,
        slice[1] as i32,
        slice[2] as i32,
        slice[3] as i32,
        slice[4] as i32,
        slice[5] as i32,
        slice[6] as i32,
        slice[7] as i32,
    ])
}

/// SIMD comparator for packed colour buffers.
pub struct SimdKernel;

impl SimdKernel {
    /// Returns true when the 8-pixel blocks agree within tolerance.
    #[inline]
    fn block_matches(
        src: i32x8,
        dst: i32x8,
        tolerance: i32x8,
        transparent: i32x8,
        channel_mask: i32x8,
    ) -> bool {
        let dr: i32x8 = ((src >> 16) & channel_mask) - ((dst >> 16) & channel_mask);
        let dg: i32x8 = ((src >> 8) & channel_mask) - ((dst >> 8) & channel_mask);
        let db: i32x8 = (src & channel_mask) - (dst & channel_mask);

        let over = dr.abs().simd_gt(tolerance)
            | dg.abs().simd_gt(tolerance)
            | db.abs().simd_gt(tolerance);
        let mismatch = over & !transparent;
        !mismatch.any()
    }
}

impl Kernel for SimdKernel {
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

        let tolerance = i32x8::splat(i32::from(params.tolerance));
        let channel_mask = i32x8::splat(0xFF);
        let key = params.transparent.map(|k| i32x8::splat(k as i32));
        let simd_end = ref_width / LANES * LANES;

        for ty in 0..reference.height() {
            let ref_row = &ref_pixels[ty * ref_width..(ty + 1) * ref_width];
            let start = (y + ty) * tgt_width + x;
            let tgt_row = &tgt_pixels[start..start + ref_width];

            let mut tx = 0;
            while tx < simd_end {
                let src = load_u32x8(&ref_row[tx..]);
                let transparent = match key {
                    Some(key) => {
                        let mask = src.simd_eq(key);
                        if mask.all() {
                            tx += LANES;
                            continue;
                        }
                        mask
                    }
                    None => i32x8::splat(0),
                };

                let dst = load_u32x8(&tgt_row[tx..]);
                if !Self::block_matches(src, dst, tolerance, transparent, channel_mask) {
                    return false;
                }
                tx += LANES;
            }

            // Scalar remainder
            if !row_matches(&ref_row[simd_end..], &tgt_row[simd_end..], params) {
                return false;
            }
        }
        true
    }
}
