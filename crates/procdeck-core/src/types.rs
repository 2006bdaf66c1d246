//! # Service Registry Domain Types
//!
//! Wire-compatible types for the supervisor backend's JSON API. Field names
//! follow the backend (`exec`, `tag`, `fdNum`, ...); the Rust names describe
//! what the values mean.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ── ExecId ───────────────────────────────────────────────────────────────────

/// Stable service key used in every per-service endpoint.
///
/// An empty id means "no service" (used by the terminal to detach).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecId(String);

impl ExecId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExecId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ExecId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── ServiceSnapshot ──────────────────────────────────────────────────────────

/// One managed process as reported by a single registry poll.
///
/// Metrics are only meaningful while `running` is true. Use the accessor
/// methods instead of the raw fields when rendering so a stopped service
/// never shows stale numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "exec")]
    pub exec_id: ExecId,

    #[serde(default)]
    pub running: bool,

    /// Free-form grouping label. Empty means no category.
    #[serde(rename = "tag", default)]
    pub category: String,

    #[serde(default)]
    pub pid: i64,

    #[serde(rename = "mem", default)]
    pub memory_bytes: u64,

    #[serde(rename = "cpu", default)]
    pub cpu_percent: f64,

    #[serde(rename = "fdNum", default)]
    pub open_handle_count: u64,

    #[serde(rename = "connections", default, deserialize_with = "null_as_default")]
    pub listen_addresses: Vec<String>,

    #[serde(rename = "paths", default, deserialize_with = "null_as_default")]
    pub watched_paths: Vec<String>,

    #[serde(
        rename = "configFile",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub config_file_path: Option<String>,
}

impl ServiceSnapshot {
    /// Minimal snapshot for a service, mostly useful for tests and fixtures.
    pub fn new(exec_id: impl Into<ExecId>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exec_id: exec_id.into(),
            running: false,
            category: String::new(),
            pid: 0,
            memory_bytes: 0,
            cpu_percent: 0.0,
            open_handle_count: 0,
            listen_addresses: Vec::new(),
            watched_paths: Vec::new(),
            config_file_path: None,
        }
    }

    pub fn category(&self) -> Option<&str> {
        if self.category.is_empty() {
            None
        } else {
            Some(&self.category)
        }
    }

    pub fn pid(&self) -> Option<i64> {
        self.running.then_some(self.pid)
    }

    pub fn memory_bytes(&self) -> Option<u64> {
        self.running.then_some(self.memory_bytes)
    }

    pub fn cpu_percent(&self) -> Option<f64> {
        self.running.then_some(self.cpu_percent)
    }

    pub fn open_handle_count(&self) -> Option<u64> {
        self.running.then_some(self.open_handle_count)
    }

    /// Whether the backend exposes a config file for remote editing.
    pub fn supports_config(&self) -> bool {
        self.config_file_path
            .as_deref()
            .is_some_and(|p| !p.is_empty())
    }
}

/// Go's encoder writes `null` for nil slices.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── LogFile ──────────────────────────────────────────────────────────────────

/// A file in a service's log directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFile {
    pub name: String,
    #[serde(rename = "size", default)]
    pub size_bytes: u64,
}

// ── DashboardInfo ────────────────────────────────────────────────────────────

/// Dashboard-wide metadata from `GET /api/config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardInfo {
    #[serde(default)]
    pub name: String,

    /// Variables available to service config files, offered as completions
    /// in the config editor.
    #[serde(rename = "metaVars", default, deserialize_with = "null_as_default")]
    pub meta_vars: BTreeMap<String, String>,
}

// ── ApiEnvelope ──────────────────────────────────────────────────────────────

/// JSON wrapper every API response uses: `{ "data": ..., "error": "..." }`.
///
/// The backend answers logical failures with HTTP 200 and a non-empty
/// `error`; an empty or missing `error` is success.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Convert into a `Result`, surfacing the backend's message verbatim.
    pub fn into_result(self) -> Result<Option<T>> {
        match self.error {
            Some(message) if !message.is_empty() => Err(Error::backend(message)),
            _ => Ok(self.data),
        }
    }
}
