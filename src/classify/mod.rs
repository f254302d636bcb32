//! Response classification subsystem.
//!
//! # Data Flow
//! ```text
//! RawResponse (status + body bytes)
//!     → envelope.rs (read code / data / msg|message)
//!     → classifier.rs (success set, fallback codes, HTTP status)
//!     → Classification::Success | Classification::Failure
//! ```

pub mod classifier;
pub mod envelope;

pub use classifier::{BackendFailure, Classification, ResponseClassifier};
pub use envelope::BackendEnvelope;
