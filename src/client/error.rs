//! What callers get back.

use thiserror::Error;

use crate::http::TransportError;
use crate::policy::{AbandonReason, FailureCategory};

/// Non-error result of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    /// The call succeeded.
    Data(T),
    /// The session was terminated; drop the call, show nothing.
    Abandoned(AbandonReason),
}

impl<T> Reply<T> {
    pub fn data(self) -> Option<T> {
        match self {
            Reply::Data(data) => Some(data),
            Reply::Abandoned(_) => None,
        }
    }

    pub fn is_abandoned(&self) -> bool {
        matches!(self, Reply::Abandoned(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Data(data) => Reply::Data(f(data)),
            Reply::Abandoned(reason) => Reply::Abandoned(reason),
        }
    }
}

/// Errors surfaced to callers.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The backend refused the call.
    #[error("backend error {code}: {message}")]
    Backend {
        code: String,
        message: String,
        category: FailureCategory,
    },

    /// The exchange never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The call succeeded but the payload does not fit the requested type.
    #[error("unexpected payload shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RequestError {
    /// Backend code, when the backend answered.
    pub fn code(&self) -> Option<&str> {
        match self {
            RequestError::Backend { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            RequestError::Backend { category, .. } => Some(*category),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RequestError::Transport(_))
    }
}

/// Result type for façade calls.
pub type RequestResult<T> = Result<Reply<T>, RequestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_helpers() {
        assert_eq!(Reply::Data(2).map(|n| n * 2).data(), Some(4));
        let abandoned: Reply<u8> = Reply::Abandoned(AbandonReason::SilentLogout);
        assert!(abandoned.is_abandoned());
        assert_eq!(abandoned.data(), None);
    }

    #[test]
    fn test_error_accessors() {
        let err = RequestError::Backend {
            code: "4000".into(),
            message: "bad input".into(),
            category: FailureCategory::Generic,
        };
        assert_eq!(err.code(), Some("4000"));
        assert_eq!(err.category(), Some(FailureCategory::Generic));
        assert_eq!(err.to_string(), "backend error 4000: bad input");

        let err = RequestError::from(TransportError::Timeout(50));
        assert!(err.is_transport());
        assert_eq!(err.code(), None);
    }
}
