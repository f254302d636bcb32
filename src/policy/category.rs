//! Failure categories.

use std::fmt;

use crate::config::CodeBook;

/// How a classified failure is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// Log out without telling the user.
    SilentLogout,
    /// Log out once the user acknowledges a blocking dialog.
    ModalLogout,
    /// Refresh the token and replay the call once.
    ExpiredToken,
    /// Hand the failure to the caller (and the notification gate).
    Generic,
}

impl FailureCategory {
    /// Category of `code`. Sets are consulted in a fixed order (logout,
    /// modal logout, expired token); anything else is `Generic`, including
    /// the empty code.
    pub fn of(code: &str, codes: &CodeBook) -> Self {
        if codes.logout.contains(code) {
            Self::SilentLogout
        } else if codes.modal_logout.contains(code) {
            Self::ModalLogout
        } else if codes.expired_token.contains(code) {
            Self::ExpiredToken
        } else {
            Self::Generic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SilentLogout => "silent_logout",
            Self::ModalLogout => "modal_logout",
            Self::ExpiredToken => "expired_token",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
