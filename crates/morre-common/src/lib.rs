//! MORRE Common Library
//!
//! Functionality shared by the MORRE client workspace members.
//!
//! Currently this is the logging setup used by the `morre` command-line tool
//! and by applications embedding `morre-client` that want the same log
//! layout.
//!
//! # Example
//!
//! ```no_run
//! use morre_common::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::from_env().unwrap_or_default();
//! init_logging(&config).ok();
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel, LogOutput};
