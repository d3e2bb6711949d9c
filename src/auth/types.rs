//! Credential types
//!
//! These types describe how requests are authorized. The impersonated
//! Workspace user of a service account is part of its credentials, so each
//! invocation states explicitly whom it acts as.

use crate::error::{Error, Result, ResultExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Google OAuth2 token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Lifetime requested for service-account assertions (Google's maximum)
pub const DEFAULT_ASSERTION_LIFETIME_SECONDS: u64 = 3600;

/// How requests are authorized
#[derive(Clone, Default)]
pub enum Credentials {
    /// No authentication (test servers only)
    #[default]
    None,

    /// Pre-issued access token
    Bearer {
        /// The bearer token
        token: String,
    },

    /// Installed-app OAuth2 refresh token
    OAuth2Refresh {
        /// Token endpoint URL
        token_url: String,
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
        /// Refresh token
        refresh_token: String,
    },

    /// Service account with domain-wide delegation
    ServiceAccount {
        /// Service account email (`iss` claim)
        client_email: String,
        /// PEM encoded RSA private key
        private_key: String,
        /// Key identifier (JWT `kid` header)
        key_id: Option<String>,
        /// Token endpoint (`aud` claim and exchange URL)
        token_url: String,
        /// Workspace user to impersonate (`sub` claim)
        subject: Option<String>,
        /// Requested scopes
        scopes: Vec<String>,
        /// Assertion lifetime in seconds
        lifetime_seconds: u64,
    },
}

impl Credentials {
    /// Build service-account credentials from a key file's contents
    pub fn service_account(
        key: ServiceAccountKey,
        subject: Option<String>,
        scopes: Vec<String>,
    ) -> Self {
        Self::ServiceAccount {
            client_email: key.client_email,
            private_key: key.private_key,
            key_id: key.private_key_id,
            token_url: key.token_uri,
            subject,
            scopes,
            lifetime_seconds: DEFAULT_ASSERTION_LIFETIME_SECONDS,
        }
    }

    /// Impersonated user, if any
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::ServiceAccount { subject, .. } => subject.as_deref(),
            _ => None,
        }
    }

    /// Replace the impersonated user of a service account
    ///
    /// Other credential kinds are returned unchanged.
    #[must_use]
    pub fn with_subject(mut self, user: impl Into<String>) -> Self {
        if let Self::ServiceAccount { subject, .. } = &mut self {
            *subject = Some(user.into());
        }
        self
    }

    /// Check if these credentials need a token exchange
    pub fn needs_token(&self) -> bool {
        matches!(
            self,
            Self::OAuth2Refresh { .. } | Self::ServiceAccount { .. }
        )
    }

    /// Short name of the credential kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bearer { .. } => "bearer",
            Self::OAuth2Refresh { .. } => "oauth2_refresh",
            Self::ServiceAccount { .. } => "service_account",
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
            Self::OAuth2Refresh {
                token_url,
                client_id,
                ..
            } => f
                .debug_struct("OAuth2Refresh")
                .field("token_url", token_url)
                .field("client_id", client_id)
                .finish_non_exhaustive(),
            Self::ServiceAccount {
                client_email,
                token_url,
                subject,
                scopes,
                ..
            } => f
                .debug_struct("ServiceAccount")
                .field("client_email", client_email)
                .field("token_url", token_url)
                .field("subject", subject)
                .field("scopes", scopes)
                .finish_non_exhaustive(),
        }
    }
}

/// Google service account key file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    /// Always "service_account"
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    /// GCP project
    #[serde(default)]
    pub project_id: Option<String>,
    /// Key identifier, sent as the JWT `kid`
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// PEM encoded private key
    pub private_key: String,
    /// Service account email
    pub client_email: String,
    /// Token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

impl ServiceAccountKey {
    /// Parse a key from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let key: Self = serde_json::from_str(json)?;
        if let Some(kind) = key.key_type.as_deref() {
            if kind != "service_account" {
                return Err(Error::auth(format!(
                    "Expected a service_account key, got '{kind}'"
                )));
            }
        }
        Ok(key)
    }

    /// Load a key file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read key file '{}'", path.display()))?;
        Self::from_json(&contents)
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false, // No expiration = never expires
        }
    }
}
