//! Low-level building blocks for custom search pipelines.
//!
//! These expose the comparator kernels, the single-scale scan, the scale
//! sweep, and the dispatcher. Most users should prefer [`crate::ImageSearcher`].

pub use crate::image::resize::resize_box;
pub use crate::kernel::scalar::{pixel_within, ScalarKernel};
#[cfg(feature = "simd")]
pub use crate::kernel::simd::SimdKernel;
pub use crate::kernel::{Kernel, ScanParams, Strategy};
pub use crate::search::dispatch::{dispatch, search_reference, split_reference_paths};
pub use crate::search::scale::{search_across_scales, ScaleIter, ScaleRange};
pub use crate::search::scan::{scan, scan_with};
pub use crate::search::SearchContext;
