//! Pagination module
//!
//! One generic, cursor-driven retrieval engine shared by every list command.
//!
//! # Overview
//!
//! A list command builds a [`PageFetcher`] bound to its resource and hands
//! it to a [`Collector`] together with a [`RetrievalRequest`] and a
//! [`ProgressSink`]. The collector calls the fetcher until one of:
//!
//! - the remote returns no (or an empty) continuation cursor,
//! - the remote returns the cursor that was just used,
//! - the result cap is reached (the crossing page is truncated),
//! - the optional [`CancelToken`] is tripped.
//!
//! Every check happens before a fetch is issued, so a misbehaving remote
//! cannot keep the collector looping on the same cursor.

mod collector;
mod types;

pub use collector::{fetcher_fn, Collector, FnFetcher, PageFetcher};
pub use types::{
    CancelToken, NoopProgress, Page, ProgressEvent, ProgressSink, RetrievalError,
    RetrievalRequest, TracingProgress, DEFAULT_PAGE_SIZE,
};
