//! Failure policy engine.
//!
//! # State Machine (per failed call)
//! ```text
//! Failure(code, message)
//!     ├─ logout code        → clear credential                     → Abandon
//!     ├─ modal-logout code  → message already on screen?  yes      → Abandon
//!     │                                                   no       → enqueue, arm unload hook,
//!     │                                                              show dialog → Abandon
//!     │                       (on acknowledge: clear credential, disarm, dequeue)
//!     ├─ expired-token code → replay attempt?             yes      → Generic
//!     │                       credential changed since send? yes   → Replay (checked by the coordinator)
//!     │                       single-flight refresh ok?   yes      → Replay
//!     │                                                   no       → Generic
//!     └─ anything else      → Generic: report unless opted out     → Fail
//! ```

use std::sync::Arc;

use crate::classify::BackendFailure;
use crate::config::CodeBook;
use crate::http::RequestId;
use crate::notify::{Acknowledgement, ModalRequest, NotificationGate, Presenter};
use crate::observability::metrics;
use crate::policy::category::FailureCategory;
use crate::policy::refresh::RefreshCoordinator;
use crate::session::{Credential, SessionState};

/// Which exchange of a call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Initial,
    /// The single replay after a token refresh.
    Replay,
}

/// Why a call was dropped without an error reaching the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonReason {
    SilentLogout,
    ModalLogout,
}

/// Everything the engine needs to know about one failed exchange.
#[derive(Debug, Clone)]
pub struct FailureContext {
    pub request_id: RequestId,
    pub failure: BackendFailure,
    /// Credential the failed exchange was sent with.
    pub sent_credential: Option<Arc<Credential>>,
    pub attempt: Attempt,
    pub skip_error_handler: bool,
}

/// What the façade does next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Abandon(AbandonReason),
    /// Send the original request again with the current credential.
    Replay,
    /// Surface the failure to the caller as a Generic error.
    Fail(BackendFailure),
}

pub struct PolicyEngine {
    codes: Arc<CodeBook>,
    session: Arc<SessionState>,
    presenter: Arc<dyn Presenter>,
    gate: Arc<NotificationGate>,
    refresh: RefreshCoordinator,
    modal_title: String,
}

impl PolicyEngine {
    pub fn new(
        codes: Arc<CodeBook>,
        session: Arc<SessionState>,
        presenter: Arc<dyn Presenter>,
        gate: Arc<NotificationGate>,
        refresh: RefreshCoordinator,
        modal_title: impl Into<String>,
    ) -> Self {
        Self {
            codes,
            session,
            presenter,
            gate,
            refresh,
            modal_title: modal_title.into(),
        }
    }

    pub fn category_of(&self, code: &str) -> FailureCategory {
        FailureCategory::of(code, &self.codes)
    }

    pub async fn resolve(&self, ctx: FailureContext) -> Resolution {
        let category = self.category_of(&ctx.failure.code);
        metrics::record_failure(category.as_str());
        tracing::debug!(
            request_id = %ctx.request_id,
            code = %ctx.failure.code,
            category = %category,
            attempt = ?ctx.attempt,
            "Backend call failed"
        );

        match category {
            FailureCategory::SilentLogout => self.silent_logout(&ctx),
            FailureCategory::ModalLogout => self.modal_logout(&ctx),
            FailureCategory::ExpiredToken => self.expired_token(ctx).await,
            FailureCategory::Generic => self.generic(ctx),
        }
    }

    fn silent_logout(&self, ctx: &FailureContext) -> Resolution {
        tracing::info!(request_id = %ctx.request_id, code = %ctx.failure.code, "Silent logout");
        self.session.logout();
        Resolution::Abandon(AbandonReason::SilentLogout)
    }

    fn modal_logout(&self, ctx: &FailureContext) -> Resolution {
        let message = self.gate.display_text(&ctx.failure.message);
        if !self.session.try_push_pending(message) {
            tracing::debug!(
                request_id = %ctx.request_id,
                message,
                "Logout dialog already open for this message"
            );
            metrics::record_notification("modal", "suppressed");
            return Resolution::Abandon(AbandonReason::ModalLogout);
        }

        tracing::info!(request_id = %ctx.request_id, code = %ctx.failure.code, "Forced logout dialog");

        let guard = self.session.install_unload_guard();
        let session = Arc::clone(&self.session);
        let owned_message = message.to_string();
        let acknowledgement = Acknowledgement::new(move || {
            session.logout();
            drop(guard);
            session.remove_pending(&owned_message);
        });

        metrics::record_notification("modal", "shown");
        self.presenter
            .show_modal(ModalRequest::blocking(&self.modal_title, message, acknowledgement));

        Resolution::Abandon(AbandonReason::ModalLogout)
    }

    async fn expired_token(&self, ctx: FailureContext) -> Resolution {
        if ctx.attempt == Attempt::Replay {
            tracing::warn!(request_id = %ctx.request_id, "Token expired again on replay");
            return self.generic(ctx);
        }

        if self.refresh.refresh(ctx.sent_credential.as_deref()).await {
            Resolution::Replay
        } else {
            self.generic(ctx)
        }
    }

    fn generic(&self, ctx: FailureContext) -> Resolution {
        if ctx.skip_error_handler {
            tracing::debug!(request_id = %ctx.request_id, "Global error handling skipped");
        } else {
            self.gate.report(&ctx.failure.message);
        }
        Resolution::Fail(ctx.failure)
    }
}
