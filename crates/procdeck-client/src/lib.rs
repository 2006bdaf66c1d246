//! # procdeck-client - Supervisor Backend Client
//!
//! Talks to the supervisor backend over HTTP (JSON envelope API) and
//! WebSocket (live stdout streams).
//!
//! Depends on [`procdeck_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! - [`Backend`] - The backend contract used by the app layer
//! - [`ApiClient`] - reqwest implementation of [`Backend`]
//! - [`Endpoint`], [`Mode`] - Server address resolution (dev/prod)
//! - [`OutputStream`] - One live stdout WebSocket

pub mod api;
pub mod backend;
pub mod endpoint;
pub mod output;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use api::{ApiClient, UPLOAD_FILE_NAME, UPLOAD_PART_NAME};
pub use backend::{Backend, LocalBackend};
pub use endpoint::{Endpoint, Mode, DEV_HOST};
pub use output::{OutputItem, OutputStream};
