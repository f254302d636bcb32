//! HTTP request middleware for an administration console.
//!
//! Sits between call sites and an HTTP transport: classifies backend
//! envelopes, recovers expired sessions with a single-flight token refresh,
//! coordinates forced logout, and keeps user-facing error notices free of
//! duplicates.

#![deny(rustdoc::broken_intra_doc_links)]

pub mod classify;
pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod notify;
pub mod observability;
pub mod policy;
pub mod session;

pub use classify::BackendEnvelope;
pub use client::{Reply, RequestClient, RequestError};
pub use config::ConsoleConfig;
pub use http::RequestDescriptor;
pub use session::{Credential, SessionState};
