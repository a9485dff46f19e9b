//! Shared plumbing for the Scout workspace.
//!
//! Kept deliberately small so every crate can depend on it: today it only
//! carries the [`observability`] helpers used by binaries and test suites.
pub mod observability;

pub use observability::{init_logging, LogConfig, LogFormat};
