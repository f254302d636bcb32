//! Notification gate for pass-through failures.
//!
//! # Responsibilities
//! - Decide whether a failure message reaches the presenter as a toast
//! - Never narrate a message that a forced-logout dialog is already showing
//!
//! # Design Decisions
//! - Toasts are not deduplicated against each other
//! - Empty messages are replaced by the configured fallback text

use std::sync::Arc;

use crate::notify::presenter::Presenter;
use crate::observability::metrics;
use crate::session::SessionState;

pub struct NotificationGate {
    session: Arc<SessionState>,
    presenter: Arc<dyn Presenter>,
    fallback_message: String,
}

impl NotificationGate {
    pub fn new(
        session: Arc<SessionState>,
        presenter: Arc<dyn Presenter>,
        fallback_message: impl Into<String>,
    ) -> Self {
        Self {
            session,
            presenter,
            fallback_message: fallback_message.into(),
        }
    }

    /// The text actually shown for `message`: the fallback when empty.
    pub fn display_text<'a>(&'a self, message: &'a str) -> &'a str {
        if message.is_empty() {
            &self.fallback_message
        } else {
            message
        }
    }

    /// Show `message` unless a dialog already carries it. Returns whether
    /// the presenter was invoked.
    pub fn report(&self, message: &str) -> bool {
        let text = self.display_text(message);

        if self.session.is_pending(text) {
            tracing::debug!(message = text, "Toast suppressed, dialog already open");
            metrics::record_notification("toast", "suppressed");
            return false;
        }

        self.presenter.show_toast(text);
        metrics::record_notification("toast", "shown");
        true
    }
}
