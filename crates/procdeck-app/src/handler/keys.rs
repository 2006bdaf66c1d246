//! Key event handlers for different UI modes
//!
//! Handlers never emit a message for a disabled control: a lifecycle key on a
//! service whose command is in flight, or config editing on a service
//! without a config file, produces nothing.

use procdeck_core::ExecId;

use crate::bus::BusEvent;
use crate::config_editor::EditorEdit;
use crate::dispatcher::ActionKind;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, UiMode};

/// Convert key events to messages based on current UI mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Force quit works everywhere
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }

    match state.ui_mode {
        UiMode::Normal => handle_key_normal(state, key),
        UiMode::Upload => handle_key_upload(state, key),
        UiMode::ConfigEditor => handle_key_config_editor(key),
        UiMode::LogMenu => handle_key_log_menu(key),
    }
}

fn handle_key_normal(state: &AppState, key: InputKey) -> Option<Message> {
    if key.is_down() {
        return Some(Message::SelectNext);
    }
    if key.is_up() {
        return Some(Message::SelectPrevious);
    }

    match key {
        InputKey::Char('q') => Some(Message::RequestQuit),

        InputKey::Char('s') => {
            let service = state.selected_service()?;
            let kind = if service.running {
                ActionKind::Stop
            } else {
                ActionKind::Start
            };
            lifecycle(state, &service.exec_id, kind)
        }

        InputKey::Char('r') => {
            let exec_id = state.selected_exec_id()?;
            lifecycle(state, &exec_id, ActionKind::Restart)
        }

        InputKey::Char('u') => {
            let exec_id = state.selected_exec_id()?;
            Some(Message::Publish(BusEvent::OpenUpload(exec_id)))
        }

        InputKey::Char('c') => {
            let service = state.selected_service()?;
            if !service.supports_config() {
                return None;
            }
            Some(Message::Publish(BusEvent::OpenConfigEditor(
                service.exec_id.clone(),
            )))
        }

        InputKey::Char('l') => Some(Message::OpenLogMenu(state.selected_exec_id()?)),

        InputKey::Enter | InputKey::Char('t') => {
            let exec_id = state.selected_exec_id()?;
            Some(Message::Publish(BusEvent::SelectTerminal(exec_id)))
        }

        InputKey::Char('x') => Some(Message::Publish(BusEvent::ClearTerminal)),

        InputKey::Esc => {
            if !state.terminal.is_active() {
                return None;
            }
            Some(Message::Publish(BusEvent::SelectTerminal(ExecId::default())))
        }

        InputKey::PageUp => Some(Message::TerminalScrollUp),
        InputKey::PageDown => Some(Message::TerminalScrollDown),

        _ => None,
    }
}

/// Lifecycle key, unless the same command is already in flight.
fn lifecycle(state: &AppState, exec_id: &ExecId, kind: ActionKind) -> Option<Message> {
    if state.dispatcher.is_in_flight(exec_id, kind) {
        return None;
    }
    Some(Message::RunCommand {
        exec_id: exec_id.clone(),
        kind,
    })
}

fn handle_key_upload(state: &AppState, key: InputKey) -> Option<Message> {
    let upload = &state.upload;
    match key {
        InputKey::Esc => Some(Message::CloseModal),
        InputKey::Enter => {
            if !upload.can_submit() {
                return None;
            }
            Some(Message::UploadSubmit)
        }
        InputKey::Char(c) if !upload.in_flight => {
            let mut path = upload.path.clone();
            path.push(c);
            Some(Message::UploadPathChanged(path))
        }
        InputKey::Backspace if !upload.in_flight => {
            let mut path = upload.path.clone();
            path.pop()?;
            Some(Message::UploadPathChanged(path))
        }
        InputKey::CharCtrl('u') if !upload.in_flight => {
            Some(Message::UploadPathChanged(String::new()))
        }
        _ => None,
    }
}

fn handle_key_config_editor(key: InputKey) -> Option<Message> {
    let edit = match key {
        InputKey::Esc => return Some(Message::CloseModal),
        InputKey::CharCtrl('s') => return Some(Message::SaveConfig),
        InputKey::CharCtrl('r') => return Some(Message::ResetConfig),
        InputKey::CharCtrl('z') => EditorEdit::Undo,
        InputKey::Tab => EditorEdit::Complete,
        InputKey::Char(c) => EditorEdit::Insert(c),
        InputKey::Enter => EditorEdit::Newline,
        InputKey::Backspace => EditorEdit::Backspace,
        InputKey::Delete => EditorEdit::Delete,
        InputKey::Left => EditorEdit::Left,
        InputKey::Right => EditorEdit::Right,
        InputKey::Up => EditorEdit::Up,
        InputKey::Down => EditorEdit::Down,
        InputKey::Home => EditorEdit::Home,
        InputKey::End => EditorEdit::End,
        _ => return None,
    };
    Some(Message::EditorEdit(edit))
}

fn handle_key_log_menu(key: InputKey) -> Option<Message> {
    if key.is_down() {
        return Some(Message::LogMenuNext);
    }
    if key.is_up() {
        return Some(Message::LogMenuPrevious);
    }
    match key {
        InputKey::Esc | InputKey::Char('q') => Some(Message::CloseModal),
        InputKey::Enter | InputKey::Char('o') => Some(Message::OpenLogFile),
        InputKey::Char('d') => Some(Message::DownloadLogFile),
        _ => None,
    }
}
