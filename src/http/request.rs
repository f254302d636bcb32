//! Request descriptions and their preparation for dispatch.
//!
//! # Responsibilities
//! - Describe one call (method, path, headers, query, body, timeout, response type)
//! - Resolve the path against the configured base URL
//! - Merge static default headers, then per-call headers
//! - Attach the current `Authorization` value and a fresh request ID
//!
//! # Design Decisions
//! - Request ID added to every exchange, including the post-refresh replay
//! - Header names and values are validated when set; later sources win
//! - A descriptor never carries a credential of its own; a stale one is stripped

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::http::transport::TransportError;

/// Header carrying the per-exchange correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Unique identifier for one outbound exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How the response body is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseType {
    /// A `{code, data, msg}` envelope, classified by business code.
    #[default]
    Json,
    /// Opaque bytes (file downloads); any 2xx status is a success.
    Bytes,
}

/// A call as issued by a caller.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the base URL, or an absolute URL.
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Overrides the configured timeout for this call only.
    pub timeout: Option<Duration>,
    pub response_type: ResponseType,
    /// Keep failures of this call out of the global notification path.
    pub skip_error_handler: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
            timeout: None,
            response_type: ResponseType::Json,
            skip_error_handler: false,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Set a per-call header, replacing any earlier value for that name.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, TransportError> {
        let (name, value) = parse_header(name, value)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn skip_error_handler(mut self) -> Self {
        self.skip_error_handler = true;
        self
    }

    /// Resolve into a concrete exchange carrying `authorization`, if any.
    pub fn prepare(
        &self,
        defaults: &RequestDefaults,
        authorization: Option<&str>,
    ) -> Result<PreparedRequest, TransportError> {
        let url = defaults.resolve(&self.url)?;

        let mut headers = defaults.headers.clone();
        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }

        headers.remove(AUTHORIZATION);
        if let Some(value) = authorization {
            let mut value = HeaderValue::from_str(value)
                .map_err(|_| TransportError::InvalidRequest("credential is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let id = RequestId::new();
        let (name, value) = parse_header(X_REQUEST_ID, &id.to_string())?;
        headers.insert(name, value);

        Ok(PreparedRequest {
            id,
            method: self.method.clone(),
            url,
            headers,
            query: self.query.clone(),
            body: self.body.clone(),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            response_type: self.response_type,
        })
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), TransportError> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| TransportError::InvalidRequest(format!("invalid header name {name:?}")))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|_| TransportError::InvalidRequest(format!("invalid value for header {name:?}")))?;
    Ok((header_name, header_value))
}

/// Build a header map from configured `name = value` pairs.
pub fn header_map(pairs: &BTreeMap<String, String>) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        let (name, value) = parse_header(name, value)?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Settings shared by every request: base URL, static headers, default timeout.
#[derive(Debug, Clone)]
pub struct RequestDefaults {
    pub base_url: Url,
    pub headers: HeaderMap,
    pub timeout: Duration,
}

impl RequestDefaults {
    pub fn from_config(service: &ServiceConfig) -> Result<Self, TransportError> {
        let base_url = Url::parse(&service.base_url)
            .map_err(|e| TransportError::InvalidRequest(format!("base_url: {e}")))?;
        Ok(Self {
            base_url,
            headers: header_map(&service.default_headers)?,
            timeout: Duration::from_millis(service.timeout_ms),
        })
    }

    /// Join `path` onto the base URL, keeping any base path prefix.
    pub fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        if let Ok(absolute) = Url::parse(path) {
            return Ok(absolute);
        }
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| TransportError::InvalidRequest(format!("{path}: {e}")))
    }
}

/// A fully resolved exchange, ready for the transport.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub id: RequestId,
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
    pub response_type: ResponseType,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> RequestDefaults {
        let mut service = ServiceConfig::default();
        service.base_url = "http://api.local/admin-api/".into();
        service
            .default_headers
            .insert("X-Tenant".into(), "acme".into());
        RequestDefaults::from_config(&service).unwrap()
    }

    #[test]
    fn test_resolve_keeps_base_path() {
        let url = defaults().resolve("/orders/list").unwrap();
        assert_eq!(url.as_str(), "http://api.local/admin-api/orders/list");

        let absolute = defaults().resolve("https://other.local/x").unwrap();
        assert_eq!(absolute.host_str(), Some("other.local"));
    }

    #[test]
    fn test_prepare_merges_headers_and_strips_stale_credential() {
        let descriptor = RequestDescriptor::get("/me")
            .header("x-tenant", "override")
            .and_then(|d| d.header("Authorization", "Bearer stale"))
            .unwrap();

        let prepared = descriptor.prepare(&defaults(), None).unwrap();
        assert_eq!(prepared.header("X-Tenant"), Some("override"));
        assert_eq!(prepared.header("authorization"), None);
        assert!(prepared.header(X_REQUEST_ID).is_some());

        let prepared = descriptor.prepare(&defaults(), Some("Bearer fresh")).unwrap();
        assert_eq!(prepared.header("Authorization"), Some("Bearer fresh"));
    }

    #[test]
    fn test_timeout_override_is_per_call() {
        let d = defaults();
        let long = RequestDescriptor::post("/batch")
            .timeout(Duration::from_secs(600))
            .prepare(&d, None)
            .unwrap();
        let short = RequestDescriptor::get("/ping").prepare(&d, None).unwrap();

        assert_eq!(long.timeout, Duration::from_secs(600));
        assert_eq!(short.timeout, Duration::from_millis(10_000));
    }

    #[test]
    fn test_replay_gets_fresh_request_id() {
        let d = defaults();
        let descriptor = RequestDescriptor::get("/me");
        let first = descriptor.prepare(&d, None).unwrap();
        let second = descriptor.prepare(&d, None).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_malformed_headers_are_rejected_when_set() {
        let err = RequestDescriptor::get("/x").header("bad header\n", "v").unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)));

        let err = RequestDescriptor::get("/x")
            .header("x-note", "v\r\nInjected: 1")
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }

    #[test]
    fn test_malformed_credential_fails_preparation() {
        let err = RequestDescriptor::get("/x")
            .prepare(&defaults(), Some("Bearer abc\r\nInjected: 1"))
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }

    #[test]
    fn test_malformed_default_header_is_rejected() {
        let mut service = ServiceConfig::default();
        service.default_headers.insert("X-Tenant".into(), "a\nb".into());
        assert!(RequestDefaults::from_config(&service).is_err());
    }

    #[test]
    fn test_response_type_travels_with_the_exchange() {
        let prepared = RequestDescriptor::get("/export")
            .response_type(ResponseType::Bytes)
            .prepare(&defaults(), None)
            .unwrap();
        assert_eq!(prepared.response_type, ResponseType::Bytes);
        assert_eq!(
            RequestDescriptor::get("/x").prepare(&defaults(), None).unwrap().response_type,
            ResponseType::Json
        );
    }
}
