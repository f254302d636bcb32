//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, apply SERVICE_* env overrides)
//!     → validation.rs (semantic checks)
//!     → ConsoleConfig (validated, immutable)
//!     → CodeBook built once and shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never reloaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A code listed in two sets is a startup error, not a priority question
//! - [`CodeBook`] is the run-time form of the four code lists

pub mod codes;
pub mod loader;
pub mod schema;
pub mod validation;

pub use codes::{CodeBook, CodeSet};
pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{AuthConfig, CodeList, ConsoleConfig, NotifyConfig, ObservabilityConfig, ServiceConfig};
pub use validation::{validate_config, ValidationError};
