//! imgsearch locates small reference images inside a captured screen buffer.
//!
//! The search is an exhaustive sliding-window comparison with a per-channel
//! tolerance and an optional transparency key, repeated over a range of
//! scales and fanned out over references on a shared worker pool (`rayon`
//! feature). The comparator has a scalar path and an 8-lane `wide` path
//! (`simd` feature) that always agree.
//!
//! Screen capture, image decoding, and resizing are collaborators behind the
//! traits in [`source`]; the `image-io` feature adds file-backed ones.

pub mod format;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod request;
pub mod search;
pub mod searcher;
pub mod source;
mod trace;
pub mod util;

pub use format::{format_error, format_matches, DebugInfo};
pub use image::resize::BoxResizer;
pub use image::{channels, pack_rgb, ColorValue, PixelBuffer};
pub use kernel::{probe_vector_support, ScanParams, Strategy};
pub use request::{SearchRect, SearchRequest};
pub use search::{Match, SearchConfig, SearchOutcome};
pub use searcher::ImageSearcher;
pub use source::{BufferScreen, ImageLoader, MemoryLoader, Resizer, ScreenSource};
pub use util::{message_for_code, SearchError, SearchResult};

#[cfg(feature = "image-io")]
pub use image::io::{FileLoader, ImageResizer, LoadOptions};
