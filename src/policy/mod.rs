//! Failure policy subsystem.
//!
//! # Data Flow
//! ```text
//! Classification::Failure
//!     → category.rs (code → SilentLogout | ModalLogout | ExpiredToken | Generic)
//!     → engine.rs (run the strategy, decide Abandon / Replay / Fail)
//!         → refresh.rs (single-flight refresh for expired tokens)
//!             → refresher.rs (default refresher over HTTP)
//! ```
//!
//! # Design Decisions
//! - Exactly one replay per call; an expiry on the replay is Generic
//! - Logout strategies never surface an error to the caller
//! - No retries on network failure

pub mod category;
pub mod engine;
pub mod refresh;
pub mod refresher;

pub use category::FailureCategory;
pub use engine::{AbandonReason, Attempt, FailureContext, PolicyEngine, Resolution};
pub use refresh::{RefreshCoordinator, TokenRefresher};
pub use refresher::HttpTokenRefresher;
