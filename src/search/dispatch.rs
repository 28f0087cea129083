//! Per-reference fan-out over a bounded worker pool.
//!
//! Each reference path becomes one task: load, sweep scales, return its own
//! [`SearchOutcome`]. Tasks only read the shared [`SearchContext`], so no
//! locking is involved. Results are merged in request order regardless of
//! completion order. Every reference is searched to completion even when
//! `find_all` is false; only the scale sweep and the scan short-circuit.

use crate::search::scale::search_across_scales;
use crate::search::{SearchContext, SearchOutcome};
use crate::source::{ImageLoader, Resizer};
use crate::trace::{trace_event, trace_skip, trace_span};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Separator between reference paths in a request.
pub const PATH_SEPARATOR: char = '|';

/// Splits a separator-delimited path list, dropping empty entries.
pub fn split_reference_paths(paths: &str) -> Vec<&str> {
    paths
        .split(PATH_SEPARATOR)
        .filter(|path| !path.is_empty())
        .collect()
}

/// Loads one reference and runs its scale sweep.
///
/// A load failure is recorded on the outcome and does not fail the request.
pub fn search_reference<L, R>(
    ctx: &SearchContext<'_>,
    path: &str,
    loader: &L,
    resizer: &R,
) -> SearchOutcome
where
    L: ImageLoader + ?Sized,
    R: Resizer + ?Sized,
{
    let _span = trace_span!("reference", path = path).entered();
    let reference = match loader.load(path) {
        Ok(reference) => reference,
        Err(err) => {
            trace_skip!("reference_skipped", path = path, code = err.code());
            return SearchOutcome::skipped(err);
        }
    };
    let matches = search_across_scales(ctx, &reference, resizer);
    trace_event!("reference_done", path = path, matches = matches.len());
    SearchOutcome::from_matches(matches)
}

/// Searches every path and merges the outcomes in the order of `paths`.
///
/// With `parallel` set (and the `rayon` feature enabled) tasks run on the
/// process-wide pool; otherwise they run sequentially on the caller thread.
/// Either way the call returns only after every task has finished.
pub fn dispatch<L, R>(
    ctx: &SearchContext<'_>,
    paths: &[&str],
    loader: &L,
    resizer: &R,
    parallel: bool,
) -> SearchOutcome
where
    L: ImageLoader + ?Sized,
    R: Resizer + ?Sized,
{
    let _span = trace_span!("dispatch", references = paths.len(), parallel = parallel).entered();

    #[cfg(feature = "rayon")]
    {
        if parallel && paths.len() > 1 {
            let run = || -> Vec<SearchOutcome> {
                paths
                    .par_iter()
                    .map(|path| search_reference(ctx, path, loader, resizer))
                    .collect()
            };
            let outcomes = match pool::shared() {
                Some(pool) => pool.install(run),
                None => run(),
            };
            return SearchOutcome::merge(outcomes);
        }
    }

    #[cfg(not(feature = "rayon"))]
    let _ = parallel;

    SearchOutcome::merge(
        paths
            .iter()
            .map(|path| search_reference(ctx, path, loader, resizer)),
    )
}

#[cfg(feature = "rayon")]
pub(crate) mod pool {
    //! Process-wide worker pool, created on first use.

    use std::sync::OnceLock;
    use std::thread;

    static POOL: OnceLock<Option<rayon::ThreadPool>> = OnceLock::new();

    /// Number of workers: the available hardware parallelism, at least 1.
    pub(crate) fn worker_count() -> usize {
        thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Returns the shared pool, or `None` if it could not be built.
    pub(crate) fn shared() -> Option<&'static rayon::ThreadPool> {
        POOL.get_or_init(|| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(worker_count())
                .thread_name(|idx| format!("imgsearch-worker-{idx}"))
                .build()
                .ok()
        })
        .as_ref()
    }
}
