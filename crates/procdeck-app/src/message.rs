//! Message types for the application (TEA pattern)

use procdeck_core::{DashboardInfo, ExecId, LogFile, ServiceSnapshot};

use crate::bus::BusEvent;
use crate::config_editor::EditorEdit;
use crate::dispatcher::{ActionKind, CommandOutcome};
use crate::input_key::InputKey;
use crate::terminal::SessionId;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates (toast expiry)
    Tick,

    /// Terminal window resized
    Resize { width: u16, height: u16 },

    /// Request to quit (may be intercepted by a modal)
    RequestQuit,

    /// Quit immediately (Ctrl+C, SIGINT/SIGTERM)
    Quit,

    /// Publish an event on the bus
    Publish(BusEvent),

    // ─────────────────────────────────────────────────────────
    // Registry
    // ─────────────────────────────────────────────────────────
    /// Poll timer fired
    PollTick,

    /// Refresh requested outside the timer (after a command settles)
    RefreshRegistry,

    /// A registry fetch finished
    RegistryFetched {
        seq: u64,
        result: Result<Vec<ServiceSnapshot>, String>,
    },

    DashboardInfoLoaded(DashboardInfo),
    DashboardInfoFailed(String),

    // ─────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────
    SelectNext,
    SelectPrevious,

    // ─────────────────────────────────────────────────────────
    // Lifecycle commands
    // ─────────────────────────────────────────────────────────
    RunCommand { exec_id: ExecId, kind: ActionKind },
    CommandSettled {
        exec_id: ExecId,
        kind: ActionKind,
        outcome: CommandOutcome,
    },

    // ─────────────────────────────────────────────────────────
    // Upload dialog
    // ─────────────────────────────────────────────────────────
    UploadDialogOpened(ExecId),
    /// Path input changed (full text)
    UploadPathChanged(String),
    UploadSubmit,
    UploadSettled {
        exec_id: ExecId,
        outcome: CommandOutcome,
    },

    // ─────────────────────────────────────────────────────────
    // Config editor
    // ─────────────────────────────────────────────────────────
    ConfigEditorOpened(ExecId),
    ConfigFileLoaded {
        exec_id: ExecId,
        fetch_id: u64,
        text: String,
    },
    ConfigFileFailed {
        exec_id: ExecId,
        fetch_id: u64,
        error: String,
    },
    /// Edit applied to the config buffer
    EditorEdit(EditorEdit),
    SaveConfig,
    ConfigSaved {
        exec_id: ExecId,
        outcome: CommandOutcome,
    },
    ResetConfig,

    // ─────────────────────────────────────────────────────────
    // Log files
    // ─────────────────────────────────────────────────────────
    OpenLogMenu(ExecId),
    LogFilesLoaded { exec_id: ExecId, files: Vec<LogFile> },
    LogFilesFailed { exec_id: ExecId, error: String },
    LogMenuNext,
    LogMenuPrevious,
    /// Open the selected log file in the browser
    OpenLogFile,
    /// Save the selected log file to the download directory
    DownloadLogFile,
    LogFileDownloaded { name: String, path: String },
    LogFileDownloadFailed { name: String, error: String },

    /// Close whichever modal is showing
    CloseModal,

    // ─────────────────────────────────────────────────────────
    // Terminal
    // ─────────────────────────────────────────────────────────
    TerminalSelect(ExecId),
    TerminalClear,
    TerminalConnected { session_id: SessionId },
    TerminalFrame { session_id: SessionId, text: String },
    /// The socket went away on its own (drop or failed connect)
    TerminalClosed {
        session_id: SessionId,
        reason: Option<String>,
    },
    TerminalScrollUp,
    TerminalScrollDown,
}
