//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject a backend code listed in more than one failure set
//! - Validate value ranges (timeout > 0, base URL parses)
//! - Reject default headers that are not valid HTTP header names/values
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ConsoleConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use reqwest::header::{HeaderName, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::config::schema::{CodeList, ConsoleConfig, ServiceConfig};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The same code appears in two code sets.
    #[error("code {code:?} is listed in both {first} and {second}")]
    OverlappingCode {
        code: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("invalid base_url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid default header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("auth.scheme must not be empty")]
    EmptyAuthScheme,
}

/// Validate a whole configuration, collecting every error.
pub fn validate_config(config: &ConsoleConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = overlapping_codes(&config.service);

    if let Err(e) = Url::parse(&config.service.base_url) {
        errors.push(ValidationError::InvalidBaseUrl {
            url: config.service.base_url.clone(),
            reason: e.to_string(),
        });
    }

    for (name, value) in &config.service.default_headers {
        let reason = match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Err(e), _) => e.to_string(),
            (_, Err(e)) => e.to_string(),
            _ => continue,
        };
        errors.push(ValidationError::InvalidHeader {
            name: name.clone(),
            reason,
        });
    }

    if config.service.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.auth.scheme.trim().is_empty() {
        errors.push(ValidationError::EmptyAuthScheme);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Every code shared between two of the code sets.
///
/// The success set takes part too: a code cannot both succeed and fail.
pub fn overlapping_codes(service: &ServiceConfig) -> Vec<ValidationError> {
    let sets: [(&'static str, &CodeList); 4] = [
        ("success_codes", &service.success_codes),
        ("logout_codes", &service.logout_codes),
        ("modal_logout_codes", &service.modal_logout_codes),
        ("expired_token_codes", &service.expired_token_codes),
    ];

    let mut errors = Vec::new();
    for (i, (first, a)) in sets.iter().enumerate() {
        for (second, b) in &sets[i + 1..] {
            for code in a.iter().filter(|code| b.iter().any(|other| other == *code)) {
                errors.push(ValidationError::OverlappingCode {
                    code: code.to_string(),
                    first: *first,
                    second: *second,
                });
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ConsoleConfig::default()).is_ok());
    }

    #[test]
    fn test_overlapping_code_is_rejected() {
        let mut config = ConsoleConfig::default();
        config.service.logout_codes = CodeList::from_csv("8888,1001");
        config.service.expired_token_codes = CodeList::from_csv("1001");

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::OverlappingCode {
                code: "1001".into(),
                first: "logout_codes",
                second: "expired_token_codes",
            }]
        );
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = ConsoleConfig::default();
        config.service.base_url = "not a url".into();
        config.service.timeout_ms = 0;
        config.service.success_codes = CodeList::from_csv("7777");

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_invalid_default_header_is_rejected() {
        let mut config = ConsoleConfig::default();
        config.service.default_headers.insert("X-Tenant".into(), "acme".into());
        config.service.default_headers.insert("bad name".into(), "x".into());
        config.service.default_headers.insert("X-Note".into(), "a\r\nInjected: 1".into());

        let errors = validate_config(&config).unwrap_err();
        let names: Vec<_> = errors
            .iter()
            .filter_map(|e| match e {
                ValidationError::InvalidHeader { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["X-Note", "bad name"]);
    }
}
