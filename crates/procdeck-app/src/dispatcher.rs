//! Lifecycle command bookkeeping.
//!
//! Each `(exec_id, kind)` pair has a loading guard. A command is only issued
//! when its guard is clear; the guard is cleared when the command settles,
//! whatever the outcome.

use std::collections::HashSet;
use std::fmt;

use procdeck_core::{Error, ExecId};

/// Lifecycle commands the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Start,
    Stop,
    Restart,
}

impl ActionKind {
    /// Path segment of the backend endpoint.
    pub fn verb(&self) -> &'static str {
        match self {
            ActionKind::Start => "start",
            ActionKind::Stop => "stop",
            ActionKind::Restart => "restart",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            ActionKind::Start => "Started",
            ActionKind::Stop => "Stopped",
            ActionKind::Restart => "Restarted",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// How a backend call settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Ok,
    /// The backend answered with `{error}`; shown verbatim
    Backend(String),
    /// The call never got a logical answer (transport, IO, ...)
    Failed(String),
}

impl CommandOutcome {
    pub fn from_result<T>(result: &procdeck_core::Result<T>) -> Self {
        match result {
            Ok(_) => CommandOutcome::Ok,
            Err(Error::Backend { message }) => CommandOutcome::Backend(message.clone()),
            Err(err) => CommandOutcome::Failed(err.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CommandOutcome::Ok)
    }

    /// Notification text for a failed outcome, `None` on success.
    ///
    /// `what` describes the operation, e.g. "start web".
    pub fn failure_message(&self, what: &str) -> Option<String> {
        match self {
            CommandOutcome::Ok => None,
            CommandOutcome::Backend(message) => Some(message.clone()),
            CommandOutcome::Failed(error) => Some(format!("Failed to {what}: {error}")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    in_flight: HashSet<(ExecId, ActionKind)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the guard. Returns false if it was already set.
    pub fn try_begin(&mut self, exec_id: &ExecId, kind: ActionKind) -> bool {
        self.in_flight.insert((exec_id.clone(), kind))
    }

    pub fn settle(&mut self, exec_id: &ExecId, kind: ActionKind) {
        self.in_flight.remove(&(exec_id.clone(), kind));
    }

    pub fn is_in_flight(&self, exec_id: &ExecId, kind: ActionKind) -> bool {
        self.in_flight.contains(&(exec_id.clone(), kind))
    }

    /// True while any command for `exec_id` is running.
    pub fn is_loading(&self, exec_id: &ExecId) -> bool {
        self.in_flight.iter().any(|(id, _)| id == exec_id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}
