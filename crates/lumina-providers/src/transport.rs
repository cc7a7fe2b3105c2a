//! HTTP transport — the one place the dispatcher touches the network.
//!
//! The dispatcher builds a [`ProviderRequest`] from the registry and hands
//! it to a [`Transport`]. [`HttpTransport`] is the reqwest implementation;
//! tests swap in a recording fake.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::{debug, warn};

use crate::registry::HeaderList;

/// Default upper bound for one provider round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A fully-built POST request for one provider.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderRequest {
    pub url: String,
    pub headers: HeaderList,
    pub body: Value,
}

/// Status and raw body of a provider response.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a JSON POST and returns whatever the server said.
///
/// Implementations return `Err` only when no HTTP response was received
/// (connection failure, timeout, …). Non-2xx statuses are `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, request: &ProviderRequest) -> Result<TransportResponse, String>;
}

// ─────────────────────────────────────────────
// HttpTransport
// ─────────────────────────────────────────────

/// reqwest-backed transport with a per-request timeout.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn header_map(headers: &HeaderList) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (key, value) in headers {
            match (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(val)) => {
                    map.insert(name, val);
                }
                _ => warn!(header = %key, "skipping invalid header"),
            }
        }
        map
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, request: &ProviderRequest) -> Result<TransportResponse, String> {
        let response = self
            .client
            .post(&request.url)
            .headers(Self::header_map(&request.headers))
            .json(&request.body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    format!("request timed out after {:?}", self.timeout)
                } else {
                    e.to_string()
                }
            })?;

        let status = response.status();
        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(status = %status, error = %e, "failed to read response body");
                status.canonical_reason().unwrap_or_default().to_string()
            }
        };

        debug!(status = status.as_u16(), bytes = body.len(), "provider responded");
        Ok(TransportResponse::new(status.as_u16(), body))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(url: String) -> ProviderRequest {
        ProviderRequest {
            url,
            headers: vec![
                ("Content-Type", "application/json".to_string()),
                ("Authorization", "Bearer test-key".to_string()),
            ],
            body: json!({ "hello": "world" }),
        }
    }

    #[test]
    fn test_response_is_success() {
        assert!(TransportResponse::new(200, "").is_success());
        assert!(TransportResponse::new(204, "").is_success());
        assert!(!TransportResponse::new(301, "").is_success());
        assert!(!TransportResponse::new(500, "").is_success());
    }

    #[test]
    fn test_invalid_header_skipped() {
        let headers = vec![
            ("X-Good", "yes".to_string()),
            ("X-Bad", "line\nbreak".to_string()),
        ];
        let map = HttpTransport::header_map(&headers);
        assert!(map.contains_key("x-good"));
        assert!(!map.contains_key("x-bad"));
    }

    #[tokio::test]
    async fn test_post_sends_headers_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_json(json!({ "hello": "world" })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(DEFAULT_TIMEOUT).unwrap();
        let resp = transport
            .post_json(&request(format!("{}/chat/completions", mock_server.uri())))
            .await
            .unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_non_success_is_ok_with_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/gen"))
            .and(query_param("key", "abc"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(DEFAULT_TIMEOUT).unwrap();
        let resp = transport
            .post_json(&request(format!("{}/gen?key=abc", mock_server.uri())))
            .await
            .unwrap();

        assert_eq!(resp.status, 429);
        assert!(!resp.is_success());
        assert_eq!(resp.body, "slow down");
    }

    #[tokio::test]
    async fn test_network_error() {
        // Point to a port that's not listening
        let transport = HttpTransport::new(DEFAULT_TIMEOUT).unwrap();
        let result = transport
            .post_json(&request("http://127.0.0.1:1/chat".to_string()))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(Duration::from_millis(200)).unwrap();
        let err = transport
            .post_json(&request(mock_server.uri()))
            .await
            .unwrap_err();
        assert!(err.contains("timed out"), "unexpected error: {err}");
    }
}
