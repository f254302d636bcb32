//! Business-level success detection.
//!
//! # Rules
//! ```text
//! success set configured  → code ∈ success set          (HTTP status ignored)
//! success set empty       → code ∈ {"0000", "200"}
//!   code absent/empty     → HTTP status == 200
//! byte responses          → any 2xx status; otherwise the body is read as an envelope
//! ```

use reqwest::StatusCode;
use serde_json::Value;

use crate::classify::envelope::BackendEnvelope;
use crate::config::CodeSet;
use crate::http::{RawResponse, ResponseType};

/// Codes treated as success when no success set is configured.
pub const FALLBACK_SUCCESS_CODES: [&str; 2] = ["0000", "200"];

/// A backend call that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFailure {
    /// Possibly empty when the backend sent no code.
    pub code: String,
    pub message: String,
    pub status: StatusCode,
}

/// Outcome of classifying one raw response.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Success(BackendEnvelope<Value>),
    /// Body of a 2xx response to a byte exchange, untouched.
    Binary(Vec<u8>),
    Failure(BackendFailure),
}

/// Decides whether a raw response is a business-level success.
#[derive(Debug, Clone, Default)]
pub struct ResponseClassifier {
    success: CodeSet,
}

impl ResponseClassifier {
    pub fn new(success: CodeSet) -> Self {
        Self { success }
    }

    pub fn classify(&self, response: &RawResponse, response_type: ResponseType) -> Classification {
        if response_type == ResponseType::Bytes && response.status.is_success() {
            return Classification::Binary(response.body.clone());
        }

        let body = response.body_json();
        let envelope = BackendEnvelope::from_body(body.as_ref());

        // A failed download may still carry a logout or expiry code.
        if response_type == ResponseType::Json && self.is_success(&envelope.code, response.status) {
            Classification::Success(envelope)
        } else {
            Classification::Failure(BackendFailure {
                code: envelope.code,
                message: envelope.message,
                status: response.status,
            })
        }
    }

    fn is_success(&self, code: &str, status: StatusCode) -> bool {
        if !self.success.is_empty() {
            return self.success.contains(code);
        }
        if !code.is_empty() {
            return FALLBACK_SUCCESS_CODES.contains(&code);
        }
        status == StatusCode::OK
    }
}
