//! Shared helpers for the befriend crates.
//!
//! Right now this is only the logging setup in [`observability`]; every binary and
//! integration test calls [`observability::init_logging`] once so that all events land
//! in the same daily log file.
//!
//! ```rust
//! use befriend_common::observability::{LogConfig, LogFormat};
//!
//! let cfg = LogConfig {
//!     format: LogFormat::Json,
//!     ..LogConfig::default()
//! };
//! assert_eq!(cfg.app_name, "befriend");
//! ```
pub mod observability;
