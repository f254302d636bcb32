//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Build RequestClient → Login
//!
//! Teardown (signals.rs):
//!     SIGINT/Ctrl-C → SessionState::on_unload (forced logout if a dialog is open) → exit
//! ```
//!
//! # Design Decisions
//! - Unload work is synchronous; nothing async is assumed to run after it

pub mod signals;

pub use signals::unload_on_interrupt;
