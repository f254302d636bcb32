//! HTTP exchange subsystem.
//!
//! # Data Flow
//! ```text
//! caller builds RequestDescriptor
//!     → request.rs (resolve URL, merge default headers, attach credential + request ID)
//!     → transport.rs (one exchange through the injectable Transport)
//!     → response.rs (status, headers, body bytes)
//!     → classify subsystem
//! ```
//!
//! # Design Decisions
//! - The descriptor is kept unmodified so it can be replayed after a token refresh
//! - Credential and request ID are applied at dispatch time, never stored in the descriptor
//! - Transport failures are distinct from backend failures and never reach the classifier

pub mod request;
pub mod response;
pub mod transport;

pub use request::{PreparedRequest, RequestDescriptor, RequestId, ResponseType, X_REQUEST_ID};
pub use response::RawResponse;
pub use transport::{ReqwestTransport, Transport, TransportError};
