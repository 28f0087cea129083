//! Pixel comparison kernels.
//!
//! A kernel answers one question: does the reference, placed with its
//! top-left corner at `(x, y)` in the target, match every non-transparent
//! pixel within tolerance? The scalar kernel is the reference behaviour;
//! the SIMD kernel must return the same answer for every input.

use std::sync::OnceLock;

use crate::image::{ColorValue, PixelBuffer};

/// Comparison parameters shared by every placement of one scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanParams {
    /// Maximum per-channel absolute difference (inclusive).
    pub tolerance: u8,
    /// Reference colour that matches any target pixel, compared bit for bit.
    pub transparent: Option<ColorValue>,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            tolerance: 0,
            transparent: None,
        }
    }
}

/// Kernel trait for single-placement comparisons.
pub trait Kernel {
    /// Returns true when `reference` matches `target` at `(x, y)`.
    ///
    /// The caller guarantees `x + reference.width() <= target.width()` and
    /// `y + reference.height() <= target.height()`.
    fn matches_at(
        target: &PixelBuffer,
        reference: &PixelBuffer,
        x: usize,
        y: usize,
        params: ScanParams,
    ) -> bool;
}

/// Comparator implementation chosen once per process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// One pixel at a time.
    Scalar,
    /// Eight pixels per step with a scalar tail.
    Vector,
}

impl Strategy {
    /// Picks the vector strategy when the build and the CPU support it.
    pub fn detect() -> Self {
        if cfg!(feature = "simd") && probe_vector_support() {
            Strategy::Vector
        } else {
            Strategy::Scalar
        }
    }

    /// Returns true for [`Strategy::Vector`].
    pub fn is_vector(self) -> bool {
        matches!(self, Strategy::Vector)
    }

    /// Compares a single placement with this strategy.
    ///
    /// Scans should dispatch once and call the kernel directly; this helper
    /// exists for spot checks and tests.
    pub fn matches_at(
        self,
        target: &PixelBuffer,
        reference: &PixelBuffer,
        x: usize,
        y: usize,
        params: ScanParams,
    ) -> bool {
        match self {
            Strategy::Scalar => scalar::ScalarKernel::matches_at(target, reference, x, y, params),
            Strategy::Vector => VectorKernel::matches_at(target, reference, x, y, params),
        }
    }
}

/// Kernel used for [`Strategy::Vector`]; scalar when `simd` is disabled.
#[cfg(feature = "simd")]
pub(crate) type VectorKernel = simd::SimdKernel;
#[cfg(not(feature = "simd"))]
pub(crate) type VectorKernel = scalar::ScalarKernel;

static VECTOR_SUPPORT: OnceLock<bool> = OnceLock::new();

/// Reports whether the CPU has native 8-lane integer vectors.
///
/// The probe runs at most once per process; later calls read the cached flag.
pub fn probe_vector_support() -> bool {
    *VECTOR_SUPPORT.get_or_init(detect_vector_support)
}

fn detect_vector_support() -> bool {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        std::arch::is_x86_feature_detected!("avx2")
    }
    #[cfg(target_arch = "aarch64")]
    {
        true
    }
    #[cfg(target_arch = "wasm32")]
    {
        cfg!(target_feature = "simd128")
    }
    #[cfg(not(any(
        target_arch = "x86",
        target_arch = "x86_64",
        target_arch = "aarch64",
        target_arch = "wasm32"
    )))]
    {
        false
    }
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(test)]
mod tests {
    use super::{probe_vector_support, Strategy};

    #[test]
    fn probe_is_stable() {
        let first = probe_vector_support();
        for _ in 0..4 {
            assert_eq!(probe_vector_support(), first);
        }
    }

    #[test]
    fn detect_never_picks_vector_without_support() {
        if !probe_vector_support() || !cfg!(feature = "simd") {
            assert_eq!(Strategy::detect(), Strategy::Scalar);
        } else {
            assert!(Strategy::detect().is_vector());
        }
    }
}
