//! HTTP transport seam.
//!
//! The client builds fully signed [`ApiRequest`]s; a transport only sends
//! them and returns the decoded JSON. Failures surface as
//! `Error::Transport` and are never retried here.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use clob_core::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the API base URL.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path without query string; this is what L2 signatures cover.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(&'static str, String)>,
    /// Serialized JSON body, byte-identical to what was signed.
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn headers(mut self, headers: Vec<(&'static str, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Header values carry signatures and API keys
        let header_names: Vec<&str> = self.headers.iter().map(|(name, _)| *name).collect();
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("headers", &header_names)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Sends requests to the CLOB API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value>;
}

/// [`HttpTransport`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: String,
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Transport {
                message: format!("Failed to build HTTP client: {}", e),
                status: None,
            })?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, path = %request.path, "Sending CLOB request");

        let mut builder = match request.method {
            HttpMethod::Get => self.http_client.get(&url),
            HttpMethod::Post => self.http_client.post(&url),
            HttpMethod::Delete => self.http_client.delete(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await.map_err(|e| Error::Transport {
            message: format!("{} {} failed: {}", request.method, request.path, e),
            status: e.status().map(|s| s.as_u16()),
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| Error::Transport {
            message: format!("Failed to read response body: {}", e),
            status: Some(status.as_u16()),
        })?;

        if !status.is_success() {
            return Err(Error::Transport {
                message: format!("{} {}: {} - {}", request.method, request.path, status, text),
                status: Some(status.as_u16()),
            });
        }

        decode_body(status.as_u16(), &text)
    }
}

/// Decode a successful response body. Empty bodies are `null`.
fn decode_body(status: u16, text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| Error::Transport {
        message: format!("response is not JSON ({}): {}", e, text),
        status: Some(status),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::get("/book")
            .query("token_id", "123")
            .headers(vec![("POLY_API_KEY", "secret-key".to_string())]);

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.query, vec![("token_id".to_string(), "123".to_string())]);
        assert_eq!(request.header("POLY_API_KEY"), Some("secret-key"));
        assert_eq!(request.header("POLY_NONCE"), None);
    }

    #[test]
    fn test_debug_hides_header_values() {
        let request = ApiRequest::new(HttpMethod::Delete, "/order")
            .headers(vec![("POLY_PASSPHRASE", "hunter2".to_string())]);
        let debug_str = format!("{:?}", request);
        assert!(debug_str.contains("POLY_PASSPHRASE"));
        assert!(!debug_str.contains("hunter2"));
    }

    #[test]
    fn test_reqwest_transport_trims_base_url() {
        let transport = ReqwestTransport::new("https://clob.polymarket.com/").unwrap();
        assert_eq!(transport.base_url(), "https://clob.polymarket.com");
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(200, "  ").unwrap(), Value::Null);
        assert_eq!(
            decode_body(200, r#"{"ok":true}"#).unwrap(),
            serde_json::json!({"ok": true})
        );
        match decode_body(200, "OK") {
            Err(Error::Transport { message, status }) => {
                assert_eq!(status, Some(200));
                assert!(message.contains("OK"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mock_transport() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|request| request.path == "/time")
            .times(1)
            .returning(|_| Ok(serde_json::json!(1_700_000_000u64)));

        let value = transport.send(ApiRequest::get("/time")).await.unwrap();
        assert_eq!(value, serde_json::json!(1_700_000_000u64));
    }
}
