//! Custom widget components

mod config_editor;
mod header;
mod log_menu;
pub mod modal_overlay;
mod service_detail;
mod service_list;
mod status_bar;
mod terminal_view;
mod toasts;
mod upload_dialog;

pub use config_editor::ConfigEditorView;
pub use header::DashboardHeader;
pub use log_menu::LogMenu;
pub use service_detail::ServiceDetail;
pub use service_list::ServiceList;
pub use status_bar::StatusBar;
pub use terminal_view::TerminalView;
pub use toasts::Toasts;
pub use upload_dialog::UploadDialog;

use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::styles;

/// Braille spinner frames
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner glyph for an animation frame.
pub fn spinner(frame: u64) -> &'static str {
    SPINNER[(frame % SPINNER.len() as u64) as usize]
}

/// Cut `text` to at most `max` display columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Keep the last `max` display columns of `text`, marking the cut with `…`.
pub fn truncate_left_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut tail = Vec::new();
    let mut used = 0;
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        tail.push(c);
        used += w;
    }
    std::iter::once('…').chain(tail.into_iter().rev()).collect()
}

/// `[key] action  [key] action` hint row.
pub fn hint_line(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (key, action) in hints {
        spans.push(Span::styled("[", styles::text_muted()));
        spans.push(Span::styled(key.to_string(), styles::keybinding()));
        spans.push(Span::styled(format!("] {}  ", action), styles::text_muted()));
    }
    Line::from(spans)
}
