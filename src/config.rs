//! Shell configuration
//!
//! The configuration file names the credentials to act with, the default
//! customer or domain, the API endpoints and the HTTP client tuning. It is
//! read from YAML, or from JSON when the file ends in `.json`. Every section
//! is optional.
//!
//! ```yaml
//! credentials:
//!   type: service_account
//!   key_file: /etc/gws/key.json
//!   subject: admin@example.com
//! customer: C0123abc
//! http:
//!   timeout_seconds: 60
//!   max_retries: 5
//! defaults:
//!   page_size: 500
//! ```

use crate::auth::{Credentials, ServiceAccountKey, GOOGLE_TOKEN_URL};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::types::{BackoffType, Service};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "GWS_SHELL_CONFIG";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete shell configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// How requests are authorized
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Customer ID for Directory resources
    #[serde(default)]
    pub customer: Option<String>,

    /// Domain for users and groups
    #[serde(default)]
    pub domain: Option<String>,

    /// Service root URLs
    #[serde(default)]
    pub endpoints: Endpoints,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Defaults for list commands
    #[serde(default)]
    pub defaults: ListDefaults,
}

impl ShellConfig {
    /// Load a config file, YAML or JSON by extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;

        let config = if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };

        debug!(path = %path.display(), credentials = config.credentials.kind(), "Loaded config");
        Ok(config)
    }

    /// Load the config file if one is given, defaults otherwise
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty file is an empty mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate a parsed config
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("endpoints.directory", &self.endpoints.directory),
            ("endpoints.calendar", &self.endpoints.calendar),
        ] {
            if let Some(url) = url {
                let parsed = Url::parse(url)
                    .map_err(|e| Error::invalid_value(name, format!("'{url}': {e}")))?;
                if parsed.cannot_be_a_base() {
                    return Err(Error::invalid_value(name, format!("'{url}' is not a base URL")));
                }
            }
        }

        if self.http.timeout_seconds == 0 {
            return Err(Error::invalid_value(
                "http.timeout_seconds",
                "must be greater than zero",
            ));
        }

        if self.defaults.page_size == 0 {
            return Err(Error::invalid_value(
                "defaults.page_size",
                "must be greater than zero",
            ));
        }

        if let CredentialsConfig::ServiceAccount { key_file, .. } = &self.credentials {
            if key_file.as_os_str().is_empty() {
                return Err(Error::invalid_value(
                    "credentials.key_file",
                    "must not be empty",
                ));
            }
        }

        Ok(())
    }

    /// Root URL of a service, honouring endpoint overrides
    pub fn base_url(&self, service: Service) -> &str {
        let configured = match service {
            Service::Directory => self.endpoints.directory.as_deref(),
            Service::Calendar => self.endpoints.calendar.as_deref(),
        };
        configured.unwrap_or_else(|| service.default_base_url())
    }

    /// HTTP client configuration for calls to `service`
    pub fn http_client_config(&self, service: Service) -> HttpClientConfig {
        let http = &self.http;
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(http.timeout_seconds))
            .max_retries(http.max_retries)
            .backoff(
                http.backoff.backoff_type,
                Duration::from_millis(http.backoff.initial_ms),
                Duration::from_millis(http.backoff.max_ms),
            );

        builder = match &http.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.rate_limit(RateLimiterConfig::for_service(service)),
        };

        if let Some(project) = &http.quota_project {
            builder = builder.header("X-Goog-User-Project", project.as_str());
        }

        builder.build()
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Credentials as written in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialsConfig {
    /// No authentication
    #[default]
    None,

    /// Pre-issued access token
    Bearer {
        /// The access token
        token: String,
    },

    /// Installed-app OAuth2 refresh token
    Oauth2Refresh {
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
        /// Refresh token
        refresh_token: String,
        /// Token endpoint
        #[serde(default = "default_token_url")]
        token_url: String,
    },

    /// Service account key with domain-wide delegation
    ServiceAccount {
        /// Path to the JSON key file
        key_file: PathBuf,
        /// Workspace user to impersonate
        #[serde(default)]
        subject: Option<String>,
        /// Scopes to request; the resource's read-only scopes when empty
        #[serde(default)]
        scopes: Vec<String>,
    },
}

fn default_token_url() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

impl CredentialsConfig {
    /// Short name of the credential kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bearer { .. } => "bearer",
            Self::Oauth2Refresh { .. } => "oauth2_refresh",
            Self::ServiceAccount { .. } => "service_account",
        }
    }

    /// Resolve into runtime credentials for calls to `service`
    ///
    /// `subject` replaces the configured impersonation subject. Relative key
    /// file paths are resolved against `base_dir`.
    pub fn resolve(
        &self,
        service: Service,
        subject: Option<&str>,
        base_dir: Option<&Path>,
    ) -> Result<Credentials> {
        let credentials = match self {
            Self::None => Credentials::None,
            Self::Bearer { token } => Credentials::Bearer {
                token: token.clone(),
            },
            Self::Oauth2Refresh {
                client_id,
                client_secret,
                refresh_token,
                token_url,
            } => Credentials::OAuth2Refresh {
                token_url: token_url.clone(),
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                refresh_token: refresh_token.clone(),
            },
            Self::ServiceAccount {
                key_file,
                subject: configured_subject,
                scopes,
            } => {
                let key_path = match base_dir {
                    Some(dir) if key_file.is_relative() => dir.join(key_file),
                    _ => key_file.clone(),
                };
                let key = ServiceAccountKey::from_file(&key_path)?;
                let scopes = if scopes.is_empty() {
                    service
                        .readonly_scopes()
                        .iter()
                        .map(ToString::to_string)
                        .collect()
                } else {
                    scopes.clone()
                };
                Credentials::service_account(key, configured_subject.clone(), scopes)
            }
        };

        Ok(match subject {
            Some(subject) => credentials.with_subject(subject),
            None => credentials,
        })
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// Service root URL overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Endpoints {
    /// Admin SDK Directory API root
    #[serde(default)]
    pub directory: Option<String>,
    /// Calendar API root
    #[serde(default)]
    pub calendar: Option<String>,
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry backoff configuration
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Rate limit; the service's per-user quota when absent
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Project billed for quota (`X-Goog-User-Project`)
    #[serde(default)]
    pub quota_project: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            backoff: BackoffConfig::default(),
            rate_limit: None,
            quota_project: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

/// Backoff configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    500
}

fn default_max_ms() -> u64 {
    32_000
}

// ============================================================================
// List Defaults
// ============================================================================

/// Defaults for list commands, overridden by command-line flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListDefaults {
    /// Page size hint
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Result cap (0 = unbounded)
    #[serde(default)]
    pub max_results: usize,
}

impl Default for ListDefaults {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_results: 0,
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
