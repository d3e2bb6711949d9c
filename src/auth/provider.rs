//! Credential provider
//!
//! Applies credentials to requests and manages access-token refresh.

use super::types::{CachedToken, Credentials};
use crate::error::{Error, Result};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Authorizes HTTP requests with cached access tokens
#[derive(Clone)]
pub struct CredentialProvider {
    /// Credentials
    credentials: Credentials,
    /// Cached access token for refresh/service-account flows
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl CredentialProvider {
    /// Create a new provider with the given credentials
    pub fn new(credentials: Credentials) -> Self {
        Self::with_client(credentials, Client::new())
    }

    /// Create a provider with a custom HTTP client
    pub fn with_client(credentials: Credentials, http_client: Client) -> Self {
        Self {
            credentials,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Apply authorization to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.credentials {
            Credentials::None => Ok(req),
            Credentials::Bearer { token } => Ok(req.bearer_auth(token)),
            Credentials::OAuth2Refresh { .. } | Credentials::ServiceAccount { .. } => {
                let token = self.access_token().await?;
                Ok(req.bearer_auth(token))
            }
        }
    }

    /// Get a valid access token, refreshing if necessary
    pub async fn access_token(&self) -> Result<String> {
        if let Credentials::Bearer { token } = &self.credentials {
            return Ok(token.clone());
        }

        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_new_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    async fn fetch_new_token(&self) -> Result<CachedToken> {
        match &self.credentials {
            Credentials::OAuth2Refresh {
                token_url,
                client_id,
                client_secret,
                refresh_token,
            } => {
                self.fetch_oauth2_refresh(token_url, client_id, client_secret, refresh_token)
                    .await
            }

            Credentials::ServiceAccount {
                client_email,
                private_key,
                key_id,
                token_url,
                subject,
                scopes,
                lifetime_seconds,
            } => {
                let assertion = sign_assertion(
                    client_email,
                    private_key,
                    key_id.as_deref(),
                    token_url,
                    subject.as_deref(),
                    scopes,
                    *lifetime_seconds,
                )?;
                self.exchange_assertion(token_url, &assertion).await
            }

            _ => Err(Error::auth(
                "Token refresh not supported for this credential type",
            )),
        }
    }

    /// Fetch an access token using the refresh token flow
    async fn fetch_oauth2_refresh(
        &self,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<CachedToken> {
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
        ];

        let response = self
            .http_client
            .post(token_url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenRefresh {
                message: format!("Refresh token request failed with status {status}: {body}"),
            });
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        debug!("Refreshed OAuth2 access token");
        Ok(token_response.into_cached_token())
    }

    /// Exchange a signed service-account assertion for an access token
    async fn exchange_assertion(&self, token_url: &str, assertion: &str) -> Result<CachedToken> {
        let form = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion)];

        let response = self
            .http_client
            .post(token_url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::JwtGeneration {
                message: format!("JWT token exchange failed with status {status}: {body}"),
            });
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        debug!(subject = ?self.credentials.subject(), "Exchanged service account assertion");
        Ok(token_response.into_cached_token())
    }

    /// Clear the cached token, forcing a refresh on next use
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Get the credentials
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl std::fmt::Debug for CredentialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialProvider")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Sign a service-account assertion (RS256)
fn sign_assertion(
    client_email: &str,
    private_key: &str,
    key_id: Option<&str>,
    audience: &str,
    subject: Option<&str>,
    scopes: &[String],
    lifetime_seconds: u64,
) -> Result<String> {
    let now = Utc::now().timestamp();
    #[allow(clippy::cast_possible_wrap)]
    let exp = now + lifetime_seconds as i64;

    let claims = AssertionClaims {
        iss: client_email.to_string(),
        sub: subject.map(String::from),
        aud: audience.to_string(),
        scope: scopes.join(" "),
        iat: now,
        exp,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key_id.map(String::from);

    let encoding_key =
        EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| Error::JwtGeneration {
            message: format!("Invalid private key: {e}"),
        })?;

    encode(&header, &claims, &encoding_key).map_err(|e| Error::JwtGeneration {
        message: format!("Failed to encode JWT: {e}"),
    })
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}

/// Service account assertion claims
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssertionClaims {
    pub(crate) iss: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub(crate) sub: Option<String>,
    pub(crate) aud: String,
    pub(crate) scope: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}
