//! Main update function - handles state transitions (TEA pattern)

use std::time::Instant;

use chrono::Local;
use tracing::{debug, warn};

use procdeck_core::ExecId;

use crate::config_editor::ConfigEditorState;
use crate::message::Message;
use crate::registry::ApplyOutcome;
use crate::state::{AppState, UiMode};

use super::{keys::handle_key, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Tick => {
            state.animation_frame = state.animation_frame.wrapping_add(1);
            state.notifications.prune_at(Instant::now());
            UpdateResult::none()
        }

        Message::Resize { width, height } => {
            state.terminal.resize(width, height);
            UpdateResult::none()
        }

        Message::RequestQuit | Message::Quit => {
            state.should_quit = true;
            UpdateResult::none()
        }

        Message::Publish(event) => UpdateResult::action(UpdateAction::Publish(event)),

        // ─────────────────────────────────────────────────────────
        // Registry
        // ─────────────────────────────────────────────────────────
        Message::PollTick | Message::RefreshRegistry => {
            let seq = state.registry.issue();
            UpdateResult::action(UpdateAction::FetchRegistry { seq })
        }

        Message::RegistryFetched { seq, result } => {
            let previous_index = state.selected_index();
            if state.registry.apply(seq, result) == ApplyOutcome::Applied {
                let services = state.registry.snapshot();
                state.tag_colors.observe_snapshot(&services);
                state.reconcile_selection(previous_index);
                state.last_refresh = Some(Local::now());
            }
            UpdateResult::none()
        }

        Message::DashboardInfoLoaded(info) => {
            state.set_dashboard(info);
            UpdateResult::none()
        }

        Message::DashboardInfoFailed(error) => {
            warn!("Failed to load dashboard info: {}", error);
            UpdateResult::none()
        }

        Message::SelectNext => {
            state.select_next();
            UpdateResult::none()
        }

        Message::SelectPrevious => {
            state.select_previous();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Lifecycle commands
        // ─────────────────────────────────────────────────────────
        Message::RunCommand { exec_id, kind } => {
            if exec_id.is_empty() || !state.dispatcher.try_begin(&exec_id, kind) {
                return UpdateResult::none();
            }
            debug!("Issuing {} for {}", kind, exec_id);
            UpdateResult::action(UpdateAction::RunCommand { exec_id, kind })
        }

        Message::CommandSettled {
            exec_id,
            kind,
            outcome,
        } => {
            state.dispatcher.settle(&exec_id, kind);
            let label = state.service_label(&exec_id);
            match outcome.failure_message(&format!("{} {}", kind.verb(), label)) {
                None => state
                    .notifications
                    .success(format!("{} {}", kind.past_tense(), label)),
                Some(message) => state.notifications.error(message),
            }
            // Backend is the source of truth for `running`, whatever happened
            UpdateResult::message(Message::RefreshRegistry)
        }

        // ─────────────────────────────────────────────────────────
        // Upload dialog
        // ─────────────────────────────────────────────────────────
        Message::UploadDialogOpened(exec_id) => {
            if exec_id.is_empty() {
                return UpdateResult::none();
            }
            state.upload.open(exec_id);
            state.ui_mode = UiMode::Upload;
            UpdateResult::none()
        }

        Message::UploadPathChanged(path) => {
            state.upload.set_path(path);
            UpdateResult::none()
        }

        Message::UploadSubmit => match state.upload.begin() {
            Some((exec_id, path)) => UpdateResult::action(UpdateAction::Upload { exec_id, path }),
            None => UpdateResult::none(),
        },

        Message::UploadSettled { exec_id, outcome } => {
            let success = outcome.is_ok();
            if state.upload.exec_id == exec_id {
                state.upload.settle(success);
            }
            let label = state.service_label(&exec_id);
            match outcome.failure_message(&format!("upload {}", label)) {
                None => state
                    .notifications
                    .success(format!("Uploaded new binary for {}", label)),
                Some(message) => state.notifications.error(message),
            }
            if success && state.ui_mode == UiMode::Upload {
                state.ui_mode = UiMode::Normal;
            }
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Config editor
        // ─────────────────────────────────────────────────────────
        Message::ConfigEditorOpened(exec_id) => {
            if exec_id.is_empty() {
                return UpdateResult::none();
            }
            let fetch_id = state.next_config_fetch();
            state.config_editor =
                Some(ConfigEditorState::loading(exec_id.clone()).with_fetch_id(fetch_id));
            state.ui_mode = UiMode::ConfigEditor;
            UpdateResult::action(UpdateAction::FetchConfigFile { exec_id, fetch_id })
        }

        Message::ConfigFileLoaded {
            exec_id,
            fetch_id,
            text,
        } => {
            if let Some(editor) = fetched_editor(state, &exec_id, fetch_id) {
                editor.load_remote(text);
            }
            UpdateResult::none()
        }

        Message::ConfigFileFailed {
            exec_id,
            fetch_id,
            error,
        } => {
            let Some(editor) = fetched_editor(state, &exec_id, fetch_id) else {
                return UpdateResult::none();
            };
            editor.load_failed(error.clone());
            state
                .notifications
                .error(format!("Failed to load config: {}", error));
            UpdateResult::none()
        }

        Message::EditorEdit(edit) => {
            if let Some(editor) = state.config_editor.as_mut() {
                editor.apply(edit, &state.completions);
            }
            UpdateResult::none()
        }

        Message::SaveConfig => {
            let Some(editor) = state.config_editor.as_mut() else {
                return UpdateResult::none();
            };
            match editor.begin_save() {
                Some(content) => UpdateResult::action(UpdateAction::SaveConfigFile {
                    exec_id: editor.exec_id.clone(),
                    content,
                }),
                None => UpdateResult::none(),
            }
        }

        Message::ConfigSaved { exec_id, outcome } => {
            if let Some(editor) = editor_for(state, &exec_id) {
                editor.finish_save();
            }
            let label = state.service_label(&exec_id);
            match outcome.failure_message(&format!("save config for {}", label)) {
                None => state
                    .notifications
                    .success(format!("Saved config for {}", label)),
                Some(message) => state.notifications.error(message),
            }
            UpdateResult::none()
        }

        Message::ResetConfig => {
            if let Some(editor) = state.config_editor.as_mut() {
                editor.reset();
            }
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Log files
        // ─────────────────────────────────────────────────────────
        Message::OpenLogMenu(exec_id) => {
            if exec_id.is_empty() {
                return UpdateResult::none();
            }
            state.log_menu.open(exec_id.clone());
            state.ui_mode = UiMode::LogMenu;
            UpdateResult::action(UpdateAction::FetchLogFiles { exec_id })
        }

        Message::LogFilesLoaded { exec_id, files } => {
            state.log_menu.loaded(&exec_id, files);
            UpdateResult::none()
        }

        Message::LogFilesFailed { exec_id, error } => {
            if state.log_menu.failed(&exec_id) {
                state
                    .notifications
                    .error(format!("Failed to list log files: {}", error));
            }
            UpdateResult::none()
        }

        Message::LogMenuNext => {
            state.log_menu.select_next();
            UpdateResult::none()
        }

        Message::LogMenuPrevious => {
            state.log_menu.select_previous();
            UpdateResult::none()
        }

        Message::OpenLogFile => match state.log_menu.selected_file() {
            Some(file) => UpdateResult::action(UpdateAction::OpenLogFile {
                exec_id: state.log_menu.exec_id.clone(),
                name: file.name.clone(),
                browser: state.settings.ui.browser.clone(),
            }),
            None => UpdateResult::none(),
        },

        Message::DownloadLogFile => match state.log_menu.selected_file() {
            Some(file) => UpdateResult::action(UpdateAction::DownloadLogFile {
                exec_id: state.log_menu.exec_id.clone(),
                name: file.name.clone(),
                dir: state.settings.downloads.dir.clone(),
            }),
            None => UpdateResult::none(),
        },

        Message::LogFileDownloaded { name, path } => {
            state
                .notifications
                .success(format!("Saved {} to {}", name, path));
            UpdateResult::none()
        }

        Message::LogFileDownloadFailed { name, error } => {
            state
                .notifications
                .error(format!("Failed to download {}: {}", name, error));
            UpdateResult::none()
        }

        Message::CloseModal => {
            match state.ui_mode {
                UiMode::Upload => state.upload.hide(),
                UiMode::ConfigEditor => state.config_editor = None,
                UiMode::LogMenu => state.log_menu.hide(),
                UiMode::Normal => {}
            }
            state.ui_mode = UiMode::Normal;
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Terminal
        // ─────────────────────────────────────────────────────────
        Message::TerminalSelect(exec_id) => {
            let (previous, link) = state.terminal.select(exec_id.clone());
            match link {
                Some(link) => UpdateResult::action(UpdateAction::OpenOutputStream {
                    session_id: state.terminal.session_id(),
                    exec_id,
                    link,
                    previous,
                }),
                // Detached: the previous task closes its socket on its own
                None => UpdateResult::none(),
            }
        }

        Message::TerminalClear => {
            state.terminal.clear();
            UpdateResult::none()
        }

        Message::TerminalConnected { session_id } => {
            state.terminal.on_connected(session_id);
            UpdateResult::none()
        }

        Message::TerminalFrame { session_id, text } => {
            state.terminal.on_frame(session_id, &text);
            UpdateResult::none()
        }

        Message::TerminalClosed { session_id, reason } => {
            state.terminal.on_closed(session_id, reason);
            UpdateResult::none()
        }

        Message::TerminalScrollUp => {
            let page = state.terminal.page_size();
            state.terminal.scroll_up(page);
            UpdateResult::none()
        }

        Message::TerminalScrollDown => {
            let page = state.terminal.page_size();
            state.terminal.scroll_down(page);
            UpdateResult::none()
        }
    }
}

fn editor_for<'a>(state: &'a mut AppState, exec_id: &ExecId) -> Option<&'a mut ConfigEditorState> {
    state
        .config_editor
        .as_mut()
        .filter(|editor| &editor.exec_id == exec_id)
}

/// The open editor, if it is still waiting on this particular fetch.
fn fetched_editor<'a>(
    state: &'a mut AppState,
    exec_id: &ExecId,
    fetch_id: u64,
) -> Option<&'a mut ConfigEditorState> {
    editor_for(state, exec_id).filter(|editor| editor.fetch_id == fetch_id)
}
