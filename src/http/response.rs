//! Raw responses as returned by the transport.

use reqwest::StatusCode;
use serde_json::Value;

use crate::http::request::RequestId;

/// One HTTP response, body fully buffered.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Exchange this response answers.
    pub request_id: RequestId,
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(request_id: RequestId, status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            request_id,
            status,
            body: body.into(),
        }
    }

    /// Convenience for building a JSON response, mostly in tests and fakes.
    pub fn json(request_id: RequestId, status: StatusCode, body: &Value) -> Self {
        Self::new(request_id, status, body.to_string())
    }

    /// The body parsed as JSON, or `None` when it is not JSON.
    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}
