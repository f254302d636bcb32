//! OS signal handling.
//!
//! # Responsibilities
//! - Treat an interrupt as the host unloading
//! - Run the session's unload hook before the process goes away

use crate::session::SessionState;

/// Wait for Ctrl-C, then fire the unload hook. Returns whether the hook
/// logged the session out.
pub async fn unload_on_interrupt(session: &SessionState) -> std::io::Result<bool> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("Interrupt received, unloading");
    Ok(session.on_unload())
}
