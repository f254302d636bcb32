//! Process-wide session state.
//!
//! # State
//! - `credential`: current access credential, swapped atomically
//! - `pending`: messages of forced-logout dialogs still on screen (ordered, unique)
//! - `unload_guards`: dialogs that force a logout if the host unloads first
//!
//! # Design Decisions
//! - All operations are synchronous so an unload hook can finish them in place
//! - Only login/logout and the failure policy write here

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwapOption;

use crate::session::credential::Credential;

/// Credential plus the bookkeeping of open forced-logout dialogs.
#[derive(Debug)]
pub struct SessionState {
    scheme: String,
    credential: ArcSwapOption<Credential>,
    pending: Mutex<Vec<String>>,
    unload_guards: AtomicUsize,
}

impl SessionState {
    /// An empty session whose `Authorization` values use `scheme`.
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            credential: ArcSwapOption::empty(),
            pending: Mutex::new(Vec::new()),
            unload_guards: AtomicUsize::new(0),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn credential(&self) -> Option<Arc<Credential>> {
        self.credential.load_full()
    }

    pub fn is_logged_in(&self) -> bool {
        self.credential.load().is_some()
    }

    pub fn login(&self, credential: Credential) {
        self.credential.store(Some(Arc::new(credential)));
        tracing::info!("Session credential installed");
    }

    /// Replace the credential after a successful refresh.
    pub fn update_credential(&self, credential: Credential) {
        self.credential.store(Some(Arc::new(credential)));
        tracing::debug!("Session credential refreshed");
    }

    /// Drop the credential. Safe to call repeatedly and concurrently;
    /// returns whether this call was the one that cleared it.
    pub fn logout(&self) -> bool {
        let cleared = self.credential.swap(None).is_some();
        if cleared {
            tracing::info!("Session credential cleared");
        }
        cleared
    }

    /// `Authorization` header value for the current credential.
    pub fn authorization(&self) -> Option<String> {
        self.credential()
            .map(|c| format!("{} {}", self.scheme, c.token))
    }

    /// Enqueue `message` unless it is already pending. Check and insert are
    /// one step, so two racing callers cannot both win.
    pub fn try_push_pending(&self, message: &str) -> bool {
        let mut pending = self.pending();
        if pending.iter().any(|m| m == message) {
            return false;
        }
        pending.push(message.to_string());
        true
    }

    pub fn remove_pending(&self, message: &str) -> bool {
        let mut pending = self.pending();
        let before = pending.len();
        pending.retain(|m| m != message);
        pending.len() != before
    }

    pub fn is_pending(&self, message: &str) -> bool {
        self.pending().iter().any(|m| m == message)
    }

    pub fn pending_messages(&self) -> Vec<String> {
        self.pending().clone()
    }

    /// Arm a forced logout on unload until the returned guard is dropped.
    pub fn install_unload_guard(self: &Arc<Self>) -> UnloadGuard {
        self.unload_guards.fetch_add(1, Ordering::SeqCst);
        UnloadGuard {
            session: Arc::clone(self),
        }
    }

    pub fn unload_guard_count(&self) -> usize {
        self.unload_guards.load(Ordering::SeqCst)
    }

    /// Host is about to tear down. Logs out synchronously if any guard is
    /// armed and reports whether it did.
    pub fn on_unload(&self) -> bool {
        if self.unload_guard_count() == 0 {
            return false;
        }
        tracing::warn!("Unload with a forced-logout dialog open, logging out");
        self.logout();
        true
    }

    fn pending(&self) -> MutexGuard<'_, Vec<String>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new("Bearer")
    }
}

/// Keeps the unload hook armed while alive.
#[derive(Debug)]
pub struct UnloadGuard {
    session: Arc<SessionState>,
}

impl Drop for UnloadGuard {
    fn drop(&mut self) {
        self.session.unload_guards.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_logout_lifecycle() {
        let session = SessionState::default();
        assert!(session.authorization().is_none());

        session.login(Credential::new("abc"));
        assert_eq!(session.authorization().as_deref(), Some("Bearer abc"));

        assert!(session.logout());
        assert!(!session.logout());
        assert!(session.authorization().is_none());
    }

    #[test]
    fn test_pending_messages_are_unique_and_ordered() {
        let session = SessionState::default();
        assert!(session.try_push_pending("kicked"));
        assert!(session.try_push_pending("expired"));
        assert!(!session.try_push_pending("kicked"));
        assert_eq!(session.pending_messages(), vec!["kicked", "expired"]);

        assert!(session.remove_pending("kicked"));
        assert!(!session.is_pending("kicked"));
        assert!(!session.remove_pending("kicked"));
    }

    #[test]
    fn test_unload_only_logs_out_when_guarded() {
        let session = Arc::new(SessionState::default());
        session.login(Credential::new("abc"));
        assert!(!session.on_unload());
        assert!(session.is_logged_in());

        let guard = session.install_unload_guard();
        assert_eq!(session.unload_guard_count(), 1);
        assert!(session.on_unload());
        assert!(!session.is_logged_in());

        drop(guard);
        assert_eq!(session.unload_guard_count(), 0);
    }

    #[test]
    fn test_concurrent_logout_is_idempotent() {
        let session = Arc::new(SessionState::default());
        session.login(Credential::new("abc"));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || session.logout())
            })
            .collect();
        let cleared = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|cleared| *cleared)
            .count();
        assert_eq!(cleared, 1);
    }
}
