//! The injectable transport primitive.
//!
//! # Responsibilities
//! - Perform exactly one HTTP exchange for a prepared request
//! - Enforce the request's own timeout
//! - Map network-level failures to `TransportError`
//!
//! # Design Decisions
//! - No retries here; the only replay happens after a token refresh, one level up
//! - Non-2xx statuses are responses, not errors; the classifier decides

use async_trait::async_trait;
use thiserror::Error;

use crate::http::request::PreparedRequest;
use crate::http::response::RawResponse;

/// Failures that happen before a response could be classified.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The request could not be built (bad URL, bad header value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out after {0} ms")]
    Timeout(u128),

    /// Any other failure while sending or reading the body.
    #[error("transport error: {0}")]
    Other(String),
}

/// Performs one HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError>;
}

/// `reqwest`-backed transport. Pooling, DNS and TLS are reqwest's business.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        let timeout = request.timeout;
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .timeout(timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = builder.headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let map_err = |e: reqwest::Error| summarize_error(e, timeout.as_millis());

        let response = builder.send().await.map_err(map_err)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_err)?;

        tracing::trace!(
            request_id = %request.id,
            status = status.as_u16(),
            bytes = body.len(),
            "Exchange complete"
        );

        Ok(RawResponse::new(request.id, status, body.to_vec()))
    }
}

fn summarize_error(err: reqwest::Error, timeout_ms: u128) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout_ms)
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else if err.is_builder() {
        TransportError::InvalidRequest(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
