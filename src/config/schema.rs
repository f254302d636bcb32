//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the request layer.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the console request layer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Backend service settings (base URL, code sets, timeouts).
    pub service: ServiceConfig,

    /// Credential handling and token refresh.
    pub auth: AuthConfig,

    /// User-facing notification texts.
    pub notify: NotifyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL every relative request path is joined onto.
    pub base_url: String,

    /// Default per-request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Codes meaning the call succeeded. Empty means "0000"/"200" or HTTP 200.
    pub success_codes: CodeList,

    /// Codes that log the user out without notice.
    pub logout_codes: CodeList,

    /// Codes that log the user out after a blocking dialog.
    pub modal_logout_codes: CodeList,

    /// Codes meaning the access token expired and may be refreshed.
    pub expired_token_codes: CodeList,

    /// Headers attached to every outbound request.
    pub default_headers: BTreeMap<String, String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 10_000,
            success_codes: CodeList::from_csv("0000"),
            logout_codes: CodeList::from_csv("8888,8889"),
            modal_logout_codes: CodeList::from_csv("7777,7778"),
            expired_token_codes: CodeList::from_csv("9999,9998,3333"),
            default_headers: BTreeMap::new(),
        }
    }
}

/// Credential and refresh configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Scheme prefixed to the token in the `Authorization` header.
    pub scheme: String,

    /// Path of the refresh endpoint, relative to the base URL.
    pub refresh_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            scheme: "Bearer".to_string(),
            refresh_path: "/auth/refreshToken".to_string(),
        }
    }
}

/// Texts used when presenting failures.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Title of the forced-logout dialog.
    pub modal_title: String,

    /// Shown when a failed call carries no message of its own.
    pub fallback_message: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            modal_title: "Error".to_string(),
            fallback_message: "the backend request error".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit compact single-line logs instead of the pretty format.
    pub compact_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            compact_logs: false,
        }
    }
}

/// An ordered list of backend codes.
///
/// Accepts either a comma separated string (`"0000,200"`) or a TOML array.
/// Entries are trimmed and blanks dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "CodeListRepr", into = "Vec<String>")]
pub struct CodeList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum CodeListRepr {
    Csv(String),
    List(Vec<String>),
}

impl From<CodeListRepr> for CodeList {
    fn from(repr: CodeListRepr) -> Self {
        match repr {
            CodeListRepr::Csv(csv) => Self::from_csv(&csv),
            CodeListRepr::List(items) => Self::from_items(items),
        }
    }
}

impl From<CodeList> for Vec<String> {
    fn from(list: CodeList) -> Self {
        list.0
    }
}

impl CodeList {
    /// Parse a comma separated list.
    pub fn from_csv(csv: &str) -> Self {
        Self::from_items(csv.split(','))
    }

    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            items
                .into_iter()
                .map(|c| c.as_ref().trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
