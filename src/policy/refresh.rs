//! Single-flight token refresh.
//!
//! # Behaviour
//! ```text
//! call A fails (expired) ─┐
//! call B fails (expired) ─┼─▶ one TokenRefresher::refresh ─▶ same bool to A, B, C
//! call C fails (expired) ─┘
//! ```
//!
//! # Design Decisions
//! - The in-flight refresh is a `Shared` future stored in a slot; joiners clone it
//! - The slot is emptied once the flight resolves, so a later expiry refreshes again
//! - "Already replaced since send?" is answered under the slot lock; a flight
//!   stores its credential before its slot is emptied
//! - Whoever polls the shared future drives it; no task is spawned

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt, Shared};

use crate::observability::metrics;
use crate::session::{Credential, SessionState};

/// Obtains a new credential and writes it into the session.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Returns whether a new credential was stored.
    async fn refresh(&self, session: &SessionState) -> bool;
}

type Flight = Shared<BoxFuture<'static, bool>>;

/// Collapses concurrent refresh requests into one call to the refresher.
pub struct RefreshCoordinator {
    refresher: Arc<dyn TokenRefresher>,
    session: Arc<SessionState>,
    slot: Mutex<Slot>,
}

#[derive(Default)]
struct Slot {
    next_id: u64,
    in_flight: Option<(u64, Flight)>,
}

impl RefreshCoordinator {
    pub fn new(refresher: Arc<dyn TokenRefresher>, session: Arc<SessionState>) -> Self {
        Self {
            refresher,
            session,
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Succeed at once when the session no longer holds `sent` (the
    /// credential the failed exchange carried); otherwise join the refresh
    /// in flight, or start one.
    pub async fn refresh(&self, sent: Option<&Credential>) -> bool {
        let Some((id, flight)) = self.join_or_start(sent) else {
            return true;
        };
        let refreshed = flight.await;

        let mut slot = self.slot();
        if matches!(slot.in_flight, Some((current, _)) if current == id) {
            slot.in_flight = None;
        }
        refreshed
    }

    fn join_or_start(&self, sent: Option<&Credential>) -> Option<(u64, Flight)> {
        let mut slot = self.slot();
        if self.replaced_since(sent) {
            tracing::debug!("Credential already refreshed");
            return None;
        }
        if let Some((id, flight)) = &slot.in_flight {
            tracing::debug!(flight = id, "Joining in-flight token refresh");
            return Some((*id, flight.clone()));
        }

        let id = slot.next_id;
        slot.next_id += 1;

        let refresher = Arc::clone(&self.refresher);
        let session = Arc::clone(&self.session);
        let flight = async move {
            tracing::info!(flight = id, "Refreshing access token");
            let refreshed = refresher.refresh(&session).await;
            metrics::record_refresh(if refreshed { "success" } else { "failure" });
            if !refreshed {
                tracing::warn!(flight = id, "Token refresh failed");
            }
            refreshed
        }
        .boxed()
        .shared();

        slot.in_flight = Some((id, flight.clone()));
        Some((id, flight))
    }

    fn replaced_since(&self, sent: Option<&Credential>) -> bool {
        match (self.session.credential(), sent) {
            (Some(current), Some(sent)) => current.token != sent.token,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
