//! Common types used throughout gws-shell
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Google Services
// ============================================================================

/// Google API service a resource belongs to
///
/// Each service has its own root endpoint, overridable through
/// [`Endpoints`](crate::config::Endpoints).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    /// Admin SDK Directory API
    Directory,
    /// Calendar API
    Calendar,
}

impl Service {
    /// Production root URL for this service
    pub fn default_base_url(self) -> &'static str {
        match self {
            Service::Directory => "https://admin.googleapis.com",
            Service::Calendar => "https://www.googleapis.com",
        }
    }

    /// Read-only OAuth scope needed to list resources of this service
    pub fn readonly_scopes(self) -> &'static [&'static str] {
        match self {
            Service::Directory => &[
                "https://www.googleapis.com/auth/admin.directory.user.readonly",
                "https://www.googleapis.com/auth/admin.directory.group.readonly",
                "https://www.googleapis.com/auth/admin.directory.device.mobile.readonly",
                "https://www.googleapis.com/auth/admin.directory.device.chromeos.readonly",
                "https://www.googleapis.com/auth/admin.directory.notifications",
                "https://www.googleapis.com/auth/admin.directory.rolemanagement.readonly",
            ],
            Service::Calendar => &["https://www.googleapis.com/auth/calendar.readonly"],
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Directory => write!(f, "directory"),
            Service::Calendar => write!(f, "calendar"),
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_type_serde() {
        let backoff: BackoffType = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(backoff, BackoffType::Linear);

        let json = serde_json::to_string(&BackoffType::Exponential).unwrap();
        assert_eq!(json, "\"exponential\"");
    }

    #[test]
    fn test_service_defaults() {
        assert_eq!(
            Service::Directory.default_base_url(),
            "https://admin.googleapis.com"
        );
        assert_eq!(Service::Calendar.to_string(), "calendar");
        assert!(Service::Calendar.readonly_scopes()[0].ends_with("calendar.readonly"));
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("test".to_string()).none_if_empty(),
            Some("test".to_string())
        );
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
        assert_eq!("test".to_string().none_if_empty(), Some("test".to_string()));
        assert_eq!(String::new().none_if_empty(), None);
    }
}
