//! Area-average resampling for packed colour buffers.
//!
//! Each destination pixel averages the source block it covers, per channel,
//! with integer rounding: `dst = (sum + n / 2) / n`. Upscaling degenerates to
//! nearest-neighbour replication. The result is deterministic and needs no
//! external decoder, which makes it the default resize collaborator.

use crate::image::{channels, pack_rgb, PixelBuffer};
use crate::source::Resizer;
use crate::util::{SearchError, SearchResult};

/// Resizes `src` to `width x height` with a box filter.
pub fn resize_box(src: &PixelBuffer, width: usize, height: usize) -> SearchResult<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(SearchError::InvalidScale { width, height });
    }
    if src.is_empty() {
        return Err(SearchError::InvalidDimensions {
            width: src.width(),
            height: src.height(),
        });
    }
    if width == src.width() && height == src.height() {
        return Ok(src.clone());
    }

    let src_w = src.width();
    let src_h = src.height();
    let data = src.pixels();
    let len = width
        .checked_mul(height)
        .ok_or(SearchError::InvalidDimensions { width, height })?;
    let mut dst = Vec::with_capacity(len);

    for dy in 0..height {
        let (y0, y1) = span(dy, height, src_h);
        for dx in 0..width {
            let (x0, x1) = span(dx, width, src_w);
            let mut sum = [0u64; 3];
            for sy in y0..y1 {
                let row = &data[sy * src_w..sy * src_w + src_w];
                for &pixel in &row[x0..x1] {
                    let (r, g, b) = channels(pixel);
                    sum[0] += u64::from(r);
                    sum[1] += u64::from(g);
                    sum[2] += u64::from(b);
                }
            }
            let n = ((y1 - y0) * (x1 - x0)) as u64;
            let avg = |s: u64| ((s + n / 2) / n) as u8;
            dst.push(pack_rgb(avg(sum[0]), avg(sum[1]), avg(sum[2])));
        }
    }

    PixelBuffer::new(dst, width, height)
}

/// Source index range covered by destination index `d` out of `dst_len`.
fn span(d: usize, dst_len: usize, src_len: usize) -> (usize, usize) {
    let start = d * src_len / dst_len;
    let end = ((d + 1) * src_len).div_ceil(dst_len);
    (start, end.max(start + 1).min(src_len))
}

/// Default resize collaborator backed by [`resize_box`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxResizer;

impl Resizer for BoxResizer {
    fn resize(&self, src: &PixelBuffer, width: usize, height: usize) -> SearchResult<PixelBuffer> {
        resize_box(src, width, height)
    }
}
