//! Pagination types and traits
//!
//! Defines the page/cursor data model, the retrieval request, the progress
//! contract and the retrieval error shared by every list operation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Default page size hint when a caller does not supply one
pub const DEFAULT_PAGE_SIZE: u32 = 100;

// ============================================================================
// Page
// ============================================================================

/// One remote response unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in remote order
    pub items: Vec<T>,
    /// Continuation token; `None` or empty means no more pages
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Create a page with an optional continuation
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Create a page with no continuation
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    /// Create a page continued by `cursor`
    pub fn with_cursor(items: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            items,
            next_cursor: Some(cursor.into()),
        }
    }

    /// Check whether the remote reported more pages
    ///
    /// An empty cursor is treated the same as an absent one.
    pub fn has_more(&self) -> bool {
        self.next_cursor.as_deref().is_some_and(|c| !c.is_empty())
    }
}

// ============================================================================
// Retrieval Request
// ============================================================================

/// Configuration for one retrieval run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalRequest {
    /// Advisory page size; the remote may ignore it
    pub page_size_hint: u32,
    /// Maximum items to accumulate (0 = unbounded)
    pub result_cap: usize,
    /// Cursor to issue the first fetch with instead of none
    pub resume_cursor: Option<String>,
}

impl Default for RetrievalRequest {
    fn default() -> Self {
        Self {
            page_size_hint: DEFAULT_PAGE_SIZE,
            result_cap: 0,
            resume_cursor: None,
        }
    }
}

impl RetrievalRequest {
    /// Create a request with the given page size hint (minimum 1)
    pub fn new(page_size_hint: u32) -> Self {
        Self {
            page_size_hint: page_size_hint.max(1),
            ..Default::default()
        }
    }

    /// Set the result cap
    #[must_use]
    pub fn with_result_cap(mut self, cap: usize) -> Self {
        self.result_cap = cap;
        self
    }

    /// Resume from a cursor captured from an earlier failed run
    #[must_use]
    pub fn with_resume_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.resume_cursor = Some(cursor.into());
        self
    }

    /// Check if the request is bounded by a cap
    pub fn is_capped(&self) -> bool {
        self.result_cap > 0
    }
}

// ============================================================================
// Progress
// ============================================================================

/// A progress notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Retrieval started
    Started {
        /// Page size hint of the run
        estimated_page_size: u32,
    },
    /// One page was appended
    PageCompleted {
        /// Items accumulated so far (after truncation)
        fetched_so_far: usize,
        /// Page size hint of the run
        page_size_hint: u32,
    },
    /// Retrieval finished successfully
    Finished {
        /// Items returned
        total_fetched: usize,
    },
}

/// Receives retrieval progress
///
/// Calls are synchronous and made from the task running the collector.
/// Implementations must not panic.
pub trait ProgressSink: Send {
    /// Retrieval started
    fn on_started(&mut self, page_size_hint: u32);

    /// A page was appended
    fn on_page_completed(&mut self, fetched_so_far: usize, page_size_hint: u32);

    /// Retrieval finished
    fn on_finished(&mut self, total_fetched: usize);
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn on_started(&mut self, _page_size_hint: u32) {}

    fn on_page_completed(&mut self, _fetched_so_far: usize, _page_size_hint: u32) {}

    fn on_finished(&mut self, _total_fetched: usize) {}
}

/// Sink that reports progress as tracing events
#[derive(Debug, Clone, Default)]
pub struct TracingProgress {
    label: String,
    pages: usize,
}

impl TracingProgress {
    /// Create a sink whose events carry `label` (usually the resource name)
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pages: 0,
        }
    }
}

impl ProgressSink for TracingProgress {
    fn on_started(&mut self, page_size_hint: u32) {
        self.pages = 0;
        info!(resource = %self.label, page_size_hint, "Starting retrieval");
    }

    fn on_page_completed(&mut self, fetched_so_far: usize, page_size_hint: u32) {
        self.pages += 1;
        debug!(
            resource = %self.label,
            page = self.pages,
            fetched_so_far,
            page_size_hint,
            "Page completed"
        );
    }

    fn on_finished(&mut self, total_fetched: usize) {
        info!(
            resource = %self.label,
            pages = self.pages,
            total_fetched,
            "Retrieval finished"
        );
    }
}

/// Recording sink, in event order
impl ProgressSink for Vec<ProgressEvent> {
    fn on_started(&mut self, page_size_hint: u32) {
        self.push(ProgressEvent::Started {
            estimated_page_size: page_size_hint,
        });
    }

    fn on_page_completed(&mut self, fetched_so_far: usize, page_size_hint: u32) {
        self.push(ProgressEvent::PageCompleted {
            fetched_so_far,
            page_size_hint,
        });
    }

    fn on_finished(&mut self, total_fetched: usize) {
        self.push(ProgressEvent::Finished { total_fetched });
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Shared flag checked by the collector before every fetch
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create an untripped token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; visible to every clone
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Retrieval Error
// ============================================================================

/// Failure of a retrieval run
///
/// Both variants carry the items accumulated before the failure and the
/// cursor a caller can pass to
/// [`RetrievalRequest::with_resume_cursor`] to pick up where it stopped.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError<T, E> {
    /// A page fetch failed
    #[error("{}: {source}", fetch_failure_context(.on_first_page, .pages_fetched))]
    FetchFailed {
        /// The failing fetch was the first of the run
        on_first_page: bool,
        /// Pages appended before the failure
        pages_fetched: usize,
        /// Cursor the failing fetch was issued with
        resume_cursor: Option<String>,
        /// Items accumulated before the failure (empty on first page)
        partial: Vec<T>,
        /// Underlying fetch error
        #[source]
        source: E,
    },
    /// The run was cancelled before the next fetch
    #[error("retrieval cancelled after {pages_fetched} page(s)")]
    Cancelled {
        /// Pages appended before cancellation
        pages_fetched: usize,
        /// Cursor the next fetch would have used
        resume_cursor: Option<String>,
        /// Items accumulated before cancellation
        partial: Vec<T>,
    },
}

impl<T, E> RetrievalError<T, E> {
    /// Items accumulated before the failure
    pub fn partial(&self) -> &[T] {
        match self {
            Self::FetchFailed { partial, .. } | Self::Cancelled { partial, .. } => partial,
        }
    }

    /// Take ownership of the items accumulated before the failure
    pub fn into_partial(self) -> Vec<T> {
        match self {
            Self::FetchFailed { partial, .. } | Self::Cancelled { partial, .. } => partial,
        }
    }

    /// Cursor to resume from
    pub fn resume_cursor(&self) -> Option<&str> {
        match self {
            Self::FetchFailed { resume_cursor, .. } | Self::Cancelled { resume_cursor, .. } => {
                resume_cursor.as_deref()
            }
        }
    }

    /// Pages appended before the failure
    pub fn pages_fetched(&self) -> usize {
        match self {
            Self::FetchFailed { pages_fetched, .. } | Self::Cancelled { pages_fetched, .. } => {
                *pages_fetched
            }
        }
    }

    /// Check if the first fetch of the run failed
    pub fn is_first_page(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed {
                on_first_page: true,
                ..
            }
        )
    }

    /// Check if this is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn fetch_failure_context(on_first_page: &bool, pages_fetched: &usize) -> String {
    if *on_first_page {
        "first page fetch failed".to_string()
    } else {
        format!("page fetch failed after {pages_fetched} page(s)")
    }
}
