//! Headless mode - NDJSON event output without the TUI
//!
//! Registry snapshots and command results are written to stdout, one JSON
//! object per line, so scripts can drive procdeck without parsing ANSI.
//!
//! # Example Output
//!
//! ```json
//! {"event":"snapshot","services":[{"name":"web","exec":"svc1","running":true}],"timestamp":1704700001000}
//! {"event":"command_settled","exec_id":"svc1","action":"stop","ok":true,"error":null,"timestamp":1704700002000}
//! ```

pub mod runner;

pub use runner::run_headless;

use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};
use tracing::error;

use procdeck_core::ServiceSnapshot;

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// A registry poll was accepted
    Snapshot {
        services: Vec<ServiceSnapshot>,
        timestamp: i64,
    },

    /// A start/stop/restart request settled
    CommandSettled {
        exec_id: String,
        action: String,
        ok: bool,
        error: Option<String>,
        timestamp: i64,
    },

    /// The backend could not be reached
    Error { message: String, timestamp: i64 },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }
        let _ = stdout.flush();
    }

    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn snapshot(services: &[ServiceSnapshot]) -> Self {
        Self::Snapshot {
            services: services.to_vec(),
            timestamp: Self::now(),
        }
    }

    pub fn command_settled(exec_id: &str, action: &str, error: Option<String>) -> Self {
        Self::CommandSettled {
            exec_id: exec_id.to_string(),
            action: action.to_string(),
            ok: error.is_none(),
            error,
            timestamp: Self::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            timestamp: Self::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_uses_wire_field_names() {
        let mut service = ServiceSnapshot::new("svc1", "web");
        service.running = true;
        let json = serde_json::to_value(HeadlessEvent::snapshot(&[service])).unwrap();

        assert_eq!(json["event"], "snapshot");
        assert_eq!(json["services"][0]["exec"], "svc1");
        assert_eq!(json["services"][0]["running"], true);
        assert!(json["timestamp"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_command_settled_ok() {
        let json =
            serde_json::to_value(HeadlessEvent::command_settled("svc1", "stop", None)).unwrap();
        assert_eq!(json["event"], "command_settled");
        assert_eq!(json["action"], "stop");
        assert_eq!(json["ok"], true);
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_command_settled_error() {
        let event = HeadlessEvent::command_settled("svc1", "start", Some("exec not found".into()));
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], "exec not found");
    }

    #[test]
    fn test_error_event() {
        let json = serde_json::to_value(HeadlessEvent::error("refused")).unwrap();
        assert_eq!(json["event"], "error");
        assert_eq!(json["message"], "refused");
    }
}
