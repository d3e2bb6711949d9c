//! Google Workspace resources
//!
//! Binds the generic retrieval engine to concrete list endpoints.
//!
//! # Overview
//!
//! - [`ResourceKind`] / [`ResourceDescriptor`]: the catalog of listable
//!   resources (path template, item field, maximum page size)
//! - [`ListQuery`] / [`Scope`]: one list call with explicit context and
//!   typed options
//! - [`ApiPageFetcher`]: a [`PageFetcher`](crate::pagination::PageFetcher)
//!   issuing one GET per page and following `nextPageToken`
//!
//! # Example
//!
//! ```rust,ignore
//! use gws_shell::pagination::{Collector, NoopProgress, RetrievalRequest};
//! use gws_shell::workspace::{ApiPageFetcher, ListQuery, ResourceKind, Scope};
//!
//! let query = ListQuery::new(ResourceKind::Members).with_scope(Scope {
//!     group_key: Some("staff@example.com".into()),
//!     ..Scope::default()
//! });
//! let mut fetcher = ApiPageFetcher::new(client, &query, "https://admin.googleapis.com", 200)?;
//! let members = Collector::new(RetrievalRequest::new(200))
//!     .run(&mut fetcher, &mut NoopProgress)
//!     .await?;
//! ```

mod fetcher;
mod options;
mod query;
mod resources;

pub use fetcher::{decode_page, ApiPageFetcher, NEXT_PAGE_TOKEN, PAGE_TOKEN};
pub use options::{
    ChromeOsOrderBy, DeviceProjection, EventOrderBy, ListOptions, MemberRole, MinAccessRole,
    MobileOrderBy, SortOrder, UserOrderBy, UserProjection, ViewType,
};
pub use query::{ListQuery, Scope, MY_CUSTOMER};
pub use resources::{ResourceDescriptor, ResourceKind};
