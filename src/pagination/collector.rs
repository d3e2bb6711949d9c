//! Cursor-driven collector
//!
//! Drives a [`PageFetcher`] until the remote runs out of pages, repeats a
//! cursor, or the result cap is reached.

use super::types::{CancelToken, Page, ProgressSink, RetrievalError, RetrievalRequest};
use crate::types::OptionStringExt;
use async_trait::async_trait;
use std::collections::HashSet;
use std::future::Future;

// ============================================================================
// Page Fetcher
// ============================================================================

/// Performs one remote call for one page
///
/// The collector never issues two fetches with the same cursor in one run.
#[async_trait]
pub trait PageFetcher<T: Send>: Send {
    /// Error produced by a failed fetch
    type Error;

    /// Fetch the page at `cursor` (`None` for the first page)
    async fn fetch_page(&mut self, cursor: Option<String>) -> Result<Page<T>, Self::Error>;
}

/// Adapts a closure returning a future into a [`PageFetcher`]
pub struct FnFetcher<F> {
    f: F,
}

/// Build a [`PageFetcher`] from a closure
///
/// ```rust,ignore
/// let mut fetcher = fetcher_fn(|cursor| async move {
///     client.list_users(cursor).await
/// });
/// ```
pub fn fetcher_fn<F>(f: F) -> FnFetcher<F> {
    FnFetcher { f }
}

#[async_trait]
impl<T, E, F, Fut> PageFetcher<T> for FnFetcher<F>
where
    T: Send,
    F: FnMut(Option<String>) -> Fut + Send,
    Fut: Future<Output = Result<Page<T>, E>> + Send,
{
    type Error = E;

    async fn fetch_page(&mut self, cursor: Option<String>) -> Result<Page<T>, E> {
        (self.f)(cursor).await
    }
}

impl<F> std::fmt::Debug for FnFetcher<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFetcher").finish_non_exhaustive()
    }
}

// ============================================================================
// Session
// ============================================================================

/// State of one `run`, discarded when it returns
struct RetrievalSession<T> {
    accumulated: Vec<T>,
    last_cursor: Option<String>,
    used_cursors: HashSet<String>,
    pages_fetched: usize,
    result_cap: usize,
}

impl<T> RetrievalSession<T> {
    fn new(result_cap: usize) -> Self {
        Self {
            accumulated: Vec::new(),
            last_cursor: None,
            used_cursors: HashSet::new(),
            pages_fetched: 0,
            result_cap,
        }
    }

    fn cap_reached(&self) -> bool {
        self.result_cap > 0 && self.accumulated.len() >= self.result_cap
    }

    /// Append a page, truncating at the cap.
    ///
    /// Returns the continuation, or `None` once the cap is reached.
    fn absorb(&mut self, page: Page<T>) -> Option<String> {
        let Page { items, next_cursor } = page;
        self.pages_fetched += 1;

        if self.result_cap > 0 {
            let room = self.result_cap.saturating_sub(self.accumulated.len());
            self.accumulated.extend(items.into_iter().take(room));
        } else {
            self.accumulated.extend(items);
        }

        if self.cap_reached() {
            None
        } else {
            next_cursor
        }
    }

    /// Record `cursor` as the one the next fetch is issued with
    fn use_cursor(&mut self, cursor: Option<String>) {
        if let Some(c) = &cursor {
            self.used_cursors.insert(c.clone());
        }
        self.last_cursor = cursor;
    }

    /// Filter a continuation through the empty and non-advancing guards.
    ///
    /// A cursor equal to the last one, or to any earlier one in this run,
    /// ends the retrieval.
    fn continuation(&self, next: Option<String>) -> Option<String> {
        next.none_if_empty().filter(|cursor| {
            self.last_cursor.as_deref() != Some(cursor.as_str())
                && !self.used_cursors.contains(cursor)
        })
    }

    fn fetch_failed<E>(self, source: E) -> RetrievalError<T, E> {
        RetrievalError::FetchFailed {
            on_first_page: self.pages_fetched == 0,
            pages_fetched: self.pages_fetched,
            resume_cursor: self.last_cursor,
            partial: self.accumulated,
            source,
        }
    }

    fn cancelled<E>(self, resume_cursor: Option<String>) -> RetrievalError<T, E> {
        RetrievalError::Cancelled {
            pages_fetched: self.pages_fetched,
            resume_cursor,
            partial: self.accumulated,
        }
    }
}

// ============================================================================
// Collector
// ============================================================================

/// Bounded, cursor-driven bulk retrieval
///
/// One collector can be reused for any number of runs; each run keeps its
/// own session and shares nothing with concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    request: RetrievalRequest,
    cancel: Option<CancelToken>,
}

impl Collector {
    /// Create a collector for the given request
    pub fn new(request: RetrievalRequest) -> Self {
        Self {
            request,
            cancel: None,
        }
    }

    /// Check `token` before every fetch
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Get the retrieval request
    pub fn request(&self) -> &RetrievalRequest {
        &self.request
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Fetch pages until exhaustion, a repeated cursor, or the cap
    ///
    /// Returns the items in fetch order, then in page order. The first fetch
    /// failing yields `FetchFailed { on_first_page: true }` with no partial
    /// items; later failures carry what was accumulated so far.
    pub async fn run<T, P>(
        &self,
        fetcher: &mut P,
        sink: &mut dyn ProgressSink,
    ) -> Result<Vec<T>, RetrievalError<T, P::Error>>
    where
        T: Send,
        P: PageFetcher<T> + ?Sized,
    {
        let hint = self.request.page_size_hint;
        let mut session = RetrievalSession::new(self.request.result_cap);

        sink.on_started(hint);

        let first_cursor = self.request.resume_cursor.clone().none_if_empty();
        if self.is_cancelled() {
            return Err(session.cancelled(first_cursor));
        }
        session.use_cursor(first_cursor.clone());

        let page = match fetcher.fetch_page(first_cursor).await {
            Ok(page) => page,
            Err(e) => return Err(session.fetch_failed(e)),
        };
        let mut next = session.absorb(page);
        sink.on_page_completed(session.accumulated.len(), hint);

        while let Some(cursor) = session.continuation(next.take()) {
            if self.is_cancelled() {
                return Err(session.cancelled(Some(cursor)));
            }

            session.use_cursor(Some(cursor.clone()));
            let page = match fetcher.fetch_page(Some(cursor)).await {
                Ok(page) => page,
                Err(e) => return Err(session.fetch_failed(e)),
            };
            next = session.absorb(page);
            sink.on_page_completed(session.accumulated.len(), hint);
        }

        sink.on_finished(session.accumulated.len());
        Ok(session.accumulated)
    }
}
