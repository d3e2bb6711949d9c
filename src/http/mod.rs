//! HTTP client module
//!
//! Provides the HTTP client used for every Google API call.
//!
//! # Features
//!
//! - **Automatic Retries**: 5xx, 429 and 403 quota responses are retried with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Google Errors**: JSON error bodies decode into [`Error::Api`](crate::Error::Api)
//! - **Authentication**: Requests are authorized through the auth module

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
