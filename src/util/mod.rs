//! Shared utility helpers.

pub mod error;
pub(crate) mod math;

pub use error::{message_for_code, SearchError, SearchResult};
