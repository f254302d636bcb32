//! Request façade subsystem.
//!
//! # Data Flow
//! ```text
//! caller: RequestDescriptor
//!     → facade.rs (attach credential, dispatch through Transport)
//!     → classify (Success | Failure)
//!     → policy engine on Failure (Abandon | Replay once | Fail)
//!     → Reply::Data / Reply::Abandoned / RequestError
//! ```

pub mod error;
pub mod facade;

pub use error::{Reply, RequestError, RequestResult};
pub use facade::{RequestClient, RequestClientBuilder};
