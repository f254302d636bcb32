//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Policy decisions, exchanges, refreshes:
//!     → logging.rs (structured tracing events, request ID on every event)
//!     → metrics.rs (counters and histograms through the `metrics` facade)
//! ```
//!
//! # Design Decisions
//! - Credentials never appear in events (`Credential` redacts itself)
//! - Metrics go through the facade only; the host decides on an exporter

pub mod logging;
pub mod metrics;
