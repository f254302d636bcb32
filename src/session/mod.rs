//! Session subsystem.
//!
//! # Lifecycle
//! ```text
//! startup          → SessionState::new (empty)
//! login            → credential installed
//! token refresh    → credential replaced
//! forced logout    → credential cleared, dialog message dequeued on acknowledge
//! unload with open dialog → on_unload() logs out synchronously
//! ```
//!
//! # Design Decisions
//! - One `Arc<SessionState>` is shared by the policy engine, notification gate and façade
//! - Callers read the credential, they never write it directly

pub mod credential;
pub mod state;

pub use credential::Credential;
pub use state::{SessionState, UnloadGuard};
