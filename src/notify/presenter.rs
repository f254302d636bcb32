//! Presenter capability: how dialogs and toasts reach the user.
//!
//! The request layer never renders anything. It hands a `ModalRequest` or a
//! toast text to a `Presenter` and moves on. A modal carries a one-shot
//! `Acknowledgement`; acknowledging it, or dropping it unacknowledged (the
//! dialog was closed some other way), runs the continuation exactly once.

use std::fmt;

/// Blocking dialog description.
#[derive(Debug)]
pub struct ModalRequest {
    pub title: String,
    pub content: String,
    /// Escape does not close the dialog.
    pub close_on_escape: bool,
    /// Clicking outside does not close the dialog.
    pub close_on_outside_click: bool,
    pub acknowledgement: Acknowledgement,
}

impl ModalRequest {
    /// A dialog the user can only leave by acknowledging it.
    pub fn blocking(
        title: impl Into<String>,
        content: impl Into<String>,
        acknowledgement: Acknowledgement,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            close_on_escape: false,
            close_on_outside_click: false,
            acknowledgement,
        }
    }
}

/// Continuation run once when a modal is acknowledged or closed.
pub struct Acknowledgement {
    on_acknowledge: Option<Box<dyn FnOnce() + Send>>,
}

impl Acknowledgement {
    pub fn new(on_acknowledge: impl FnOnce() + Send + 'static) -> Self {
        Self {
            on_acknowledge: Some(Box::new(on_acknowledge)),
        }
    }

    /// User confirmed the dialog.
    pub fn acknowledge(mut self) {
        self.fire();
    }

    fn fire(&mut self) {
        if let Some(on_acknowledge) = self.on_acknowledge.take() {
            on_acknowledge();
        }
    }
}

impl Drop for Acknowledgement {
    fn drop(&mut self) {
        self.fire();
    }
}

impl fmt::Debug for Acknowledgement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Acknowledgement")
            .field("pending", &self.on_acknowledge.is_some())
            .finish()
    }
}

/// Renders dialogs and toasts. Calls are fire-and-forget.
pub trait Presenter: Send + Sync {
    fn show_modal(&self, modal: ModalRequest);
    fn show_toast(&self, message: &str);
}

/// Presenter for terminal hosts: writes to stderr and acknowledges modals
/// as soon as they are printed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn show_modal(&self, modal: ModalRequest) {
        eprintln!("{}: {}", modal.title, modal.content);
        modal.acknowledgement.acknowledge();
    }

    fn show_toast(&self, message: &str) {
        eprintln!("error: {message}");
    }
}
