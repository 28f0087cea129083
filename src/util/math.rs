//! Numeric helpers for scale stepping and coordinate arithmetic.

/// Returns `value * scale` rounded half away from zero.
///
/// Returns 0 when the product is not finite or not positive, so callers can
/// treat it as a skipped scale.
pub(crate) fn scaled_dim(value: usize, scale: f32) -> usize {
    let scaled = (value as f32 * scale).round();
    if !scaled.is_finite() || scaled <= 0.0 {
        return 0;
    }
    scaled as usize
}

/// Clamps a float to `floor` when it is non-positive, NaN, or below the floor.
pub(crate) fn positive_or(value: f32, fallback: f32, floor: f32) -> f32 {
    let value = if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    };
    value.max(floor)
}

/// Absolute difference of two channel values.
#[inline]
pub(crate) fn abs_diff_u8(a: u8, b: u8) -> u8 {
    a.max(b) - a.min(b)
}
