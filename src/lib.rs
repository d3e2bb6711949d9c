// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # gws-shell
//!
//! A command-line shell over the Google Workspace list APIs. Every listing
//! (users, groups, members, devices, calendars, events, ...) goes through one
//! cursor-paginated [`Collector`].
//!
//! ## Features
//!
//! - **Bounded retrieval**: result caps, resume cursors, and a guard against
//!   APIs that hand back the same page token forever
//! - **Partial results**: a failure after the first page keeps what was
//!   fetched along with the cursor to resume from
//! - **Auth**: bearer tokens, OAuth2 refresh tokens, and service accounts
//!   with domain-wide delegation
//! - **HTTP**: retries with backoff, `Retry-After`, and per-service rate limits
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gws_shell::workspace::{ApiPageFetcher, ListQuery, ResourceKind};
//! use gws_shell::{Collector, HttpClient, NoopProgress, RetrievalRequest, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = gws_shell::ShellConfig::load("gws.yaml")?;
//!     let service = gws_shell::Service::Directory;
//!     let credentials = config.credentials.resolve(service, None, None)?;
//!     let client = HttpClient::with_credentials(config.http_client_config(service), credentials)?;
//!
//!     let query = ListQuery::new(ResourceKind::Users);
//!     let mut fetcher = ApiPageFetcher::new(client, &query, config.base_url(service), 500)?;
//!
//!     let users = Collector::new(RetrievalRequest::new(500).with_result_cap(1000))
//!         .run(&mut fetcher, &mut NoopProgress)
//!         .await?;
//!     println!("{} users", users.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 CLI: gws list <resource>                     │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌───────────┬─────────────────┴──────┬──────────┬─────────────┐
//! │  Config   │  Workspace             │ Collector│  Output     │
//! ├───────────┼────────────────────────┼──────────┼─────────────┤
//! │ YAML/JSON │ Resource catalog       │ Cursor   │ JSON        │
//! │ Endpoints │ Query rendering        │ Cap      │ JSON lines  │
//! │ Defaults  │ Page decoding          │ Resume   │ Table       │
//! └───────────┴────────────────────────┴──────────┴─────────────┘
//!                               │
//!                ┌──────────────┴──────────────┐
//!                │ HTTP (retry, rate limit)    │
//!                │ Auth (bearer, OAuth2, JWT)  │
//!                └─────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credentials and token providers
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Cursor-paginated retrieval
pub mod pagination;

/// Google Workspace resources, queries, and page decoding
pub mod workspace;

/// Rendering of retrieved items
pub mod output;

/// Configuration file
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::Credentials;
pub use config::ShellConfig;
pub use error::{Error, Result};
pub use http::HttpClient;
pub use pagination::{
    CancelToken, Collector, NoopProgress, Page, PageFetcher, ProgressSink, RetrievalError,
    RetrievalRequest,
};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
