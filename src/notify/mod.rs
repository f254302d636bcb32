//! User notification subsystem.
//!
//! # Data Flow
//! ```text
//! Generic failure / transport failure (not opted out)
//!     → gate.rs (cross-check against dialogs on screen)
//!     → presenter.rs (toast)
//!
//! Modal logout
//!     → presenter.rs (blocking dialog + one-shot acknowledgement)
//! ```

pub mod gate;
pub mod presenter;

pub use gate::NotificationGate;
pub use presenter::{Acknowledgement, ModalRequest, Presenter, TerminalPresenter};
