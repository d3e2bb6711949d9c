//! Error types for gws-shell
//!
//! This module defines the error hierarchy for the shell.
//! All public APIs return `Result<T, Error>` where Error is defined here,
//! except the retrieval engine which reports its own generic
//! [`RetrievalError`](crate::pagination::RetrievalError).

use crate::pagination::RetrievalError;
use thiserror::Error;

/// The main error type for gws-shell
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required parameter '{name}' for {resource}")]
    MissingParameter { resource: String, name: String },

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Token refresh failed: {message}")]
    TokenRefresh { message: String },

    #[error("JWT generation failed: {message}")]
    JwtGeneration { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Google API error {status} ({reason}): {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Retrieval Errors
    // ============================================================================
    #[error("Failed to decode page: {message}")]
    Decode { message: String },

    #[error("Page fetch failed after {pages_fetched} page(s): {source}")]
    FetchFailed {
        pages_fetched: usize,
        resume_cursor: Option<String>,
        #[source]
        source: Box<Error>,
    },

    #[error("Retrieval cancelled after {pages_fetched} page(s)")]
    Cancelled {
        pages_fetched: usize,
        resume_cursor: Option<String>,
    },

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing path/query parameter error
    pub fn missing_parameter(resource: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingParameter {
            resource: resource.into(),
            name: name.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a Google API error
    pub fn api(status: u16, reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            reason: reason.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            Error::Api { status, reason, .. } => {
                is_retryable_status(*status) || is_rate_limit_reason(reason)
            }
            Error::FetchFailed { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Cursor a caller can resume from after a failed or cancelled retrieval
    pub fn resume_cursor(&self) -> Option<&str> {
        match self {
            Error::FetchFailed { resume_cursor, .. } | Error::Cancelled { resume_cursor, .. } => {
                resume_cursor.as_deref()
            }
            _ => None,
        }
    }
}

impl<T> From<RetrievalError<T, Error>> for Error {
    fn from(err: RetrievalError<T, Error>) -> Self {
        match err {
            RetrievalError::FetchFailed {
                pages_fetched,
                resume_cursor,
                source,
                ..
            } => Error::FetchFailed {
                pages_fetched,
                resume_cursor,
                source: Box::new(source),
            },
            RetrievalError::Cancelled {
                pages_fetched,
                resume_cursor,
                ..
            } => Error::Cancelled {
                pages_fetched,
                resume_cursor,
            },
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Google reports per-user and per-project quota exhaustion as 403
pub(crate) fn is_rate_limit_reason(reason: &str) -> bool {
    matches!(
        reason,
        "rateLimitExceeded" | "userRateLimitExceeded" | "quotaExceeded"
    )
}

/// Result type alias for gws-shell
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
