//! # procdeck-core - Core Domain Types
//!
//! Foundation crate for procdeck. Provides the service registry domain types,
//! error handling, logging setup, and text helpers shared by every other crate.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, regex, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`ServiceSnapshot`] - One managed process as reported by the backend
//! - [`ExecId`] - Stable service key used in every per-service endpoint
//! - [`LogFile`] - A log file entry from a service's log directory
//! - [`DashboardInfo`] - Dashboard title and config meta-variables
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ### Formatting (`format`, `ansi`)
//! - [`format_bytes()`] - Human-readable byte sizes
//! - [`strip_ansi_codes()`] - Remove terminal escape sequences from output
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use procdeck_core::prelude::*;
//! ```

pub mod ansi;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all procdeck crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use ansi::strip_ansi_codes;
pub use error::{Error, Result, ResultExt};
pub use format::{format_bytes, format_percent};
pub use types::{DashboardInfo, ExecId, LogFile, ServiceSnapshot};
