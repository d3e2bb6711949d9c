//! Tests for the HTTP client module

use super::client::api_error;
use super::*;
use crate::auth::Credentials;
use crate::error::Error;
use crate::types::BackoffType;
use reqwest::StatusCode;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_config(base_url: String) -> HttpClientConfig {
    HttpClientConfig::builder()
        .base_url(base_url)
        .max_retries(2)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_millis(10),
        )
        .no_rate_limit()
        .build()
}

fn google_error(code: u16, reason: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code": code,
            "message": message,
            "errors": [{"domain": "global", "reason": reason, "message": message}]
        }
    })
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_some());
    assert!(config.user_agent.starts_with("gws-shell/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://admin.googleapis.com")
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .header("X-Goog-User-Project", "billing-project")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(
        config.base_url,
        Some("https://admin.googleapis.com".to_string())
    );
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
    assert_eq!(
        config.default_headers.get("X-Goog-User-Project"),
        Some(&"billing-project".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_request_config_builder_keeps_query_order() {
    let config = RequestConfig::new()
        .query("customer", "my_customer")
        .queries([("maxResults", "500"), ("pageToken", "abc")])
        .header("X-Request-Id", "abc123")
        .timeout(Duration::from_secs(10))
        .retries(2);

    assert_eq!(
        config.query,
        vec![
            ("customer".to_string(), "my_customer".to_string()),
            ("maxResults".to_string(), "500".to_string()),
            ("pageToken".to_string(), "abc".to_string()),
        ]
    );
    assert_eq!(
        config.headers.get("X-Request-Id"),
        Some(&"abc123".to_string())
    );
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    assert_eq!(config.max_retries, Some(2));
}

#[tokio::test]
async fn test_get_json_with_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/directory/v1/users"))
        .and(query_param("customer", "my_customer"))
        .and(query_param("maxResults", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "users": [{"primaryEmail": "a@example.com"}, {"primaryEmail": "b@example.com"}]
        })))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let config = RequestConfig::new()
        .query("customer", "my_customer")
        .query("maxResults", "2");

    let body: serde_json::Value = client
        .get_json_with_config("/admin/directory/v1/users", config)
        .await
        .unwrap();
    assert_eq!(body["users"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_default_and_request_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/calendar/v3/users/me/settings"))
        .and(header("X-Goog-User-Project", "billing-project"))
        .and(header("X-Request-Id", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("X-Goog-User-Project", "billing-project")
        .no_rate_limit()
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let response = client
        .get_with_config(
            "calendar/v3/users/me/settings",
            RequestConfig::new().header("X-Request-Id", "abc"),
        )
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_bearer_credentials_are_applied() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/calendar/v3/users/me/calendarList"))
        .and(header("Authorization", "Bearer ya29.static"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_credentials(
        fast_config(mock_server.uri()),
        Credentials::Bearer {
            token: "ya29.static".to_string(),
        },
    )
    .unwrap();

    client.get("/calendar/v3/users/me/calendarList").await.unwrap();
    assert_eq!(client.credentials().unwrap().credentials().kind(), "bearer");
}

#[tokio::test]
async fn test_google_error_is_decoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/directory/v1/groups/missing/members"))
        .respond_with(ResponseTemplate::new(404).set_body_json(google_error(
            404,
            "notFound",
            "Resource Not Found: groupKey",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let err = client
        .get("/admin/directory/v1/groups/missing/members")
        .await
        .unwrap_err();

    match err {
        Error::Api {
            status,
            reason,
            message,
        } => {
            assert_eq!(status, 404);
            assert_eq!(reason, "notFound");
            assert_eq!(message, "Resource Not Found: groupKey");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_body_is_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let err = client.get("/broken").await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 400, ref body } if body == "Bad Request"));
}

#[tokio::test]
async fn test_forbidden_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/directory/v1/users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(google_error(
            403,
            "forbidden",
            "Not Authorized to access this resource/api",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let err = client.get("/admin/directory/v1/users").await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 403, .. }));
}

#[tokio::test]
async fn test_quota_forbidden_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/directory/v1/users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(google_error(
            403,
            "userRateLimitExceeded",
            "Rate Limit Exceeded",
        )))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/directory/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"users": []})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let response = client.get("/admin/directory/v1/users").await.unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_retry_on_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500).set_body_json(google_error(
            500,
            "backendError",
            "Backend Error",
        )))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let body: serde_json::Value = client.get_json("/flaky").await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_max_retries_returns_last_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503).set_body_json(google_error(
            503,
            "backendError",
            "Service Unavailable",
        )))
        .expect(3) // initial attempt + 2 retries
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let err = client.get("/down").await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 503, .. }));
}

#[tokio::test]
async fn test_429_honours_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    assert!(client.get("/limited").await.is_ok());
}

#[tokio::test]
async fn test_429_exhausted_is_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let err = client
        .get_with_config("/limited", RequestConfig::new().retries(0))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::RateLimited {
            retry_after_seconds: 0
        }
    ));
}

#[tokio::test]
async fn test_unauthorized_refreshes_token_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fresh",
            "expires_in": 3600
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/calendar/v3/users/me/settings"))
        .respond_with(ResponseTemplate::new(401).set_body_json(google_error(
            401,
            "authError",
            "Invalid Credentials",
        )))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/calendar/v3/users/me/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_credentials(
        fast_config(mock_server.uri()),
        Credentials::OAuth2Refresh {
            token_url: format!("{}/token", mock_server.uri()),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "refresh".to_string(),
        },
    )
    .unwrap();

    assert!(client.get("/calendar/v3/users/me/settings").await.is_ok());
}

#[tokio::test]
async fn test_full_url_bypasses_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/absolute"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config("https://unused.invalid".to_string())).unwrap();
    client
        .get(&format!("{}/absolute", mock_server.uri()))
        .await
        .unwrap();
}

#[test]
fn test_backoff_calculations() {
    let exponential = HttpClient::with_config(
        HttpClientConfig::builder()
            .backoff(
                BackoffType::Exponential,
                Duration::from_millis(100),
                Duration::from_secs(1),
            )
            .no_rate_limit()
            .build(),
    )
    .unwrap();
    assert_eq!(exponential.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(exponential.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(exponential.calculate_backoff(3), Duration::from_millis(800));
    assert_eq!(exponential.calculate_backoff(10), Duration::from_secs(1));

    let linear = HttpClient::with_config(
        HttpClientConfig::builder()
            .backoff(
                BackoffType::Linear,
                Duration::from_millis(100),
                Duration::from_secs(10),
            )
            .no_rate_limit()
            .build(),
    )
    .unwrap();
    assert_eq!(linear.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(linear.calculate_backoff(2), Duration::from_millis(300));

    let constant = HttpClient::with_config(
        HttpClientConfig::builder()
            .backoff(
                BackoffType::Constant,
                Duration::from_millis(250),
                Duration::from_secs(10),
            )
            .no_rate_limit()
            .build(),
    )
    .unwrap();
    assert_eq!(constant.calculate_backoff(5), Duration::from_millis(250));
}

#[test]
fn test_api_error_prefers_first_reason() {
    let body = google_error(403, "quotaExceeded", "Quota exceeded").to_string();
    let err = api_error(StatusCode::FORBIDDEN, &body);
    assert!(err.is_retryable());
    assert!(matches!(err, Error::Api { ref reason, .. } if reason == "quotaExceeded"));
}

#[test]
fn test_api_error_falls_back_to_status_field() {
    let body = r#"{"error": {"code": 400, "message": "Bad syncToken", "status": "INVALID_ARGUMENT"}}"#;
    let err = api_error(StatusCode::BAD_REQUEST, body);
    assert!(matches!(err, Error::Api { ref reason, .. } if reason == "INVALID_ARGUMENT"));
    assert!(!err.is_retryable());
}

#[test]
fn test_http_client_debug_and_rate_limiter() {
    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    assert!(client.has_rate_limiter());
    assert!(format!("{client:?}").contains("HttpClient"));

    let unlimited =
        HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap();
    assert!(!unlimited.has_rate_limiter());
}
