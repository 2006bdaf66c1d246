//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers for UI modes

pub(crate) mod keys;
pub(crate) mod update;


use std::path::PathBuf;

use procdeck_core::ExecId;

use crate::bus::BusEvent;
use crate::dispatcher::ActionKind;
use crate::message::Message;
use crate::terminal::{SessionId, StreamHandle, StreamLink};

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Fetch the registry; the result is tagged with `seq`
    FetchRegistry { seq: u64 },

    /// Fetch dashboard title and meta-variables (once, at startup)
    FetchDashboardInfo,

    /// Issue a lifecycle command. The guard is already set.
    RunCommand { exec_id: ExecId, kind: ActionKind },

    /// Read `path` and upload it as the service's new binary
    Upload { exec_id: ExecId, path: PathBuf },

    FetchConfigFile { exec_id: ExecId, fetch_id: u64 },

    SaveConfigFile { exec_id: ExecId, content: String },

    FetchLogFiles { exec_id: ExecId },

    /// Open a log file URL in the system browser.
    ///
    /// Fire-and-forget OS call. If `browser` is empty, the platform default
    /// opener is used.
    OpenLogFile {
        exec_id: ExecId,
        name: String,
        browser: String,
    },

    /// Download a log file into `dir`
    DownloadLogFile {
        exec_id: ExecId,
        name: String,
        dir: PathBuf,
    },

    /// Open the live stdout stream for a new terminal session.
    ///
    /// `previous` is the replaced session's handle, already told to close.
    /// The stream task waits for it to report closed before connecting, so
    /// two sockets are never open at once.
    OpenOutputStream {
        session_id: SessionId,
        exec_id: ExecId,
        link: StreamLink,
        previous: Option<StreamHandle>,
    },

    /// Deliver an event to the bus subscribers
    Publish(BusEvent),
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
