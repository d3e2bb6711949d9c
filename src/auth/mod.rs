//! Authentication module
//!
//! Supports: static Bearer tokens, OAuth2 refresh tokens, and service
//! accounts with domain-wide delegation.
//!
//! The `CredentialProvider` applies credentials to requests and caches the
//! access tokens obtained from refresh and service-account exchanges.

mod provider;
mod types;

pub use provider::CredentialProvider;
pub use types::{
    CachedToken, Credentials, ServiceAccountKey, DEFAULT_ASSERTION_LIFETIME_SECONDS,
    GOOGLE_TOKEN_URL,
};

#[cfg(test)]
mod tests;
