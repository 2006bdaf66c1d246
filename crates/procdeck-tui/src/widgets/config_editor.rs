//! Config editor modal.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use procdeck_app::config_editor::{ConfigEditorState, EditorStatus};

use super::{hint_line, modal_overlay};
use crate::theme::{palette, styles};

pub struct ConfigEditorView<'a> {
    editor: &'a ConfigEditorState,
    label: &'a str,
}

impl<'a> ConfigEditorView<'a> {
    pub fn new(editor: &'a ConfigEditorState, label: &'a str) -> Self {
        Self { editor, label }
    }

    fn title(&self) -> String {
        let mut title = format!(" Config · {}", self.label);
        if self.editor.is_dirty() {
            title.push_str(" [modified]");
        }
        if self.editor.saving {
            title.push_str(" saving…");
        }
        title.push(' ');
        title
    }

    fn text_lines(&self, rows: usize) -> Vec<Line<'static>> {
        let buffer = &self.editor.buffer;
        let (cursor_row, cursor_col) = buffer.cursor();
        let first = cursor_row.saturating_sub(rows.saturating_sub(1));
        let gutter = buffer.lines().len().to_string().len();

        buffer
            .lines()
            .iter()
            .enumerate()
            .skip(first)
            .take(rows)
            .map(|(row, text)| {
                let mut spans = vec![Span::styled(
                    format!("{:>width$} ", row + 1, width = gutter),
                    Style::default().fg(palette::LINE_NUMBER),
                )];
                if row == cursor_row {
                    spans.extend(with_cursor(text, cursor_col));
                } else {
                    spans.push(Span::styled(text.clone(), styles::text_primary()));
                }
                Line::from(spans)
            })
            .collect()
    }
}

/// Split `text` around the cursor cell at char index `col`.
fn with_cursor(text: &str, col: usize) -> Vec<Span<'static>> {
    let cursor_style = Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::CURSOR_BG);
    let before: String = text.chars().take(col).collect();
    let at: String = text.chars().nth(col).map(String::from).unwrap_or(" ".into());
    let after: String = text.chars().skip(col + 1).collect();
    vec![
        Span::styled(before, styles::text_primary()),
        Span::styled(at, cursor_style),
        Span::styled(after, styles::text_primary()),
    ]
}

impl Widget for ConfigEditorView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = modal_overlay::centered_rect_percent(80, 80, area);
        modal_overlay::prepare(buf, area, modal);

        let block = styles::modal_block(self.title());
        let inner = block.inner(modal);
        block.render(modal, buf);
        if inner.height < 2 || inner.width == 0 {
            return;
        }

        let body = Rect {
            height: inner.height - 1,
            ..inner
        };
        let footer = Rect {
            y: inner.bottom() - 1,
            height: 1,
            ..inner
        };

        let lines = match &self.editor.status {
            EditorStatus::Loading => vec![Line::styled("Loading…", styles::text_muted())],
            EditorStatus::Failed => vec![Line::styled(
                format!(
                    "Could not load config: {}",
                    self.editor.error.as_deref().unwrap_or("unknown error")
                ),
                styles::status_red(),
            )],
            EditorStatus::Ready => self.text_lines(usize::from(body.height)),
        };
        Paragraph::new(lines).render(body, buf);

        Paragraph::new(hint_line(&[
            ("Ctrl+S", "save"),
            ("Ctrl+R", "reset"),
            ("Ctrl+Z", "undo"),
            ("Tab", "complete"),
            ("Esc", "close"),
        ]))
        .render(footer, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use procdeck_app::config_editor::EditorEdit;
    use procdeck_core::ExecId;
    use std::collections::BTreeSet;

    fn ready(text: &str) -> ConfigEditorState {
        let mut editor = ConfigEditorState::loading(ExecId::from("svc1"));
        editor.load_remote(text.to_string());
        editor
    }

    fn render(editor: &ConfigEditorState) -> TestTerminal {
        let mut term = TestTerminal::new();
        term.render_widget(ConfigEditorView::new(editor, "api"), term.area());
        term
    }

    #[test]
    fn test_shows_numbered_lines() {
        let term = render(&ready("port: 80\nhost: 0.0.0.0"));
        assert!(term.buffer_contains("Config · api"));
        assert!(term.buffer_contains("1 port: 80"));
        assert!(term.buffer_contains("2 host: 0.0.0.0"));
        assert!(!term.buffer_contains("[modified]"));
    }

    #[test]
    fn test_modified_marker_after_edit() {
        let mut editor = ready("a");
        editor.apply(EditorEdit::Insert('b'), &BTreeSet::new());
        assert!(render(&editor).buffer_contains("[modified]"));
    }

    #[test]
    fn test_loading_and_failed_states() {
        let editor = ConfigEditorState::loading(ExecId::from("svc1"));
        assert!(render(&editor).buffer_contains("Loading…"));

        let mut editor = ConfigEditorState::loading(ExecId::from("svc1"));
        editor.load_failed("exec not found".into());
        assert!(render(&editor).buffer_contains("Could not load config: exec not found"));
    }

    #[test]
    fn test_cursor_split() {
        let spans = with_cursor("abc", 1);
        assert_eq!(spans[0].content, "a");
        assert_eq!(spans[1].content, "b");
        assert_eq!(spans[2].content, "c");

        let spans = with_cursor("abc", 3);
        assert_eq!(spans[1].content, " ");
    }
}
