//! High-level search entry point.
//!
//! [`ImageSearcher`] owns the collaborators and the comparator strategy and
//! runs one request end to end: normalize, capture, dispatch, format.

use crate::format::{finish, format_error, format_matches, DebugInfo};
use crate::image::resize::BoxResizer;
use crate::kernel::Strategy;
use crate::request::SearchRequest;
use crate::search::dispatch::dispatch;
use crate::search::{SearchContext, SearchOutcome};
use crate::source::{ImageLoader, Resizer, ScreenSource};
use crate::trace::{trace_event, trace_span};
use crate::util::SearchResult;

/// Locates reference images on a screen.
///
/// The searcher holds no per-request state; concurrent calls through a
/// shared reference are independent.
#[derive(Clone, Debug)]
pub struct ImageSearcher<S, L, R = BoxResizer> {
    screen: S,
    loader: L,
    resizer: R,
    strategy: Strategy,
}

impl<S, L> ImageSearcher<S, L, BoxResizer>
where
    S: ScreenSource,
    L: ImageLoader,
{
    /// Creates a searcher with the box resizer and the detected strategy.
    pub fn new(screen: S, loader: L) -> Self {
        Self {
            screen,
            loader,
            resizer: BoxResizer,
            strategy: Strategy::detect(),
        }
    }
}

impl<S, L, R> ImageSearcher<S, L, R>
where
    S: ScreenSource,
    L: ImageLoader,
    R: Resizer,
{
    /// Replaces the resize collaborator.
    pub fn with_resizer<R2: Resizer>(self, resizer: R2) -> ImageSearcher<S, L, R2> {
        ImageSearcher {
            screen: self.screen,
            loader: self.loader,
            resizer,
            strategy: self.strategy,
        }
    }

    /// Forces a comparator strategy.
    ///
    /// [`Strategy::Vector`] is honoured even when the probe reports no native
    /// support; the result is identical, only slower.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the active comparator strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the screen collaborator.
    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// Runs a request and renders the wire string.
    ///
    /// Fatal errors render as `{code}[message]`; no-match is
    /// `{0}[No Match Found]`.
    pub fn search(&self, request: &SearchRequest) -> String {
        let (width, height) = self.screen.screen_size();
        let normalized = match request.normalized(width, height) {
            Ok(normalized) => normalized,
            Err(err) => return format_error(&err),
        };
        let config = &normalized.config;
        // Fatal errors are reported bare, like an invalid region.
        let outcome = match self.run(&normalized) {
            Ok(outcome) => outcome,
            Err(err) => return format_error(&err),
        };
        let payload = format_matches(&outcome.matches, config.max_results, config.center);
        let debug = config.debug.then(|| {
            DebugInfo::new(
                &request.references,
                normalized.rect,
                config,
                self.strategy.is_vector(),
            )
        });
        finish(payload, debug.as_ref(), config.max_output_len)
    }

    /// Runs a request and returns the merged matches.
    ///
    /// Matches are raw top-left positions; `max_results` and `center` only
    /// apply to the wire rendering.
    pub fn search_outcome(&self, request: &SearchRequest) -> SearchResult<SearchOutcome> {
        let (width, height) = self.screen.screen_size();
        let normalized = request.normalized(width, height)?;
        self.run(&normalized)
    }

    fn run(&self, request: &SearchRequest) -> SearchResult<SearchOutcome> {
        let _span = trace_span!(
            "search",
            references = request.references.as_str(),
            vector = self.strategy.is_vector()
        )
        .entered();

        let rect = request.rect;
        let target = self.screen.capture(&rect)?;
        let config = &request.config;
        let ctx = SearchContext {
            target: &target,
            origin: (rect.left, rect.top),
            params: config.scan_params(),
            scales: config.scale_range(),
            find_all: config.find_all,
            strategy: self.strategy,
        };
        let paths = request.reference_paths();
        let outcome = dispatch(&ctx, &paths, &self.loader, &self.resizer, config.parallel);
        trace_event!(
            "search_done",
            matches = outcome.matches.len(),
            skipped = outcome.skipped
        );
        Ok(outcome)
    }
}
