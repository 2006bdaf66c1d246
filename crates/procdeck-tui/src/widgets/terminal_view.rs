//! Terminal pane for the active output stream.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use procdeck_app::terminal::{TerminalSession, TerminalStatus};
use procdeck_core::strip_ansi_codes;

use crate::theme::styles;

pub struct TerminalView<'a> {
    session: &'a TerminalSession,
    focused: bool,
}

impl<'a> TerminalView<'a> {
    pub fn new(session: &'a TerminalSession) -> Self {
        Self {
            session,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn title(&self) -> Line<'static> {
        let session = self.session;
        let mut spans = vec![Span::styled(" Terminal", styles::accent_bold())];
        if !session.exec_id().is_empty() {
            spans.push(Span::styled(" · ", styles::text_muted()));
            spans.push(Span::styled(
                session.exec_id().to_string(),
                styles::text_primary(),
            ));
        }
        let (label, style): (String, Style) = match (session.status(), session.disconnected()) {
            (_, Some(reason)) => (format!("disconnected: {}", reason), styles::status_red()),
            (TerminalStatus::Idle, None) => (String::new(), styles::text_muted()),
            (TerminalStatus::Connecting, None) => ("connecting…".into(), styles::status_yellow()),
            (TerminalStatus::Streaming, None) => ("streaming".into(), styles::status_green()),
            (TerminalStatus::Closed, None) => ("closed".into(), styles::text_muted()),
        };
        if !label.is_empty() {
            spans.push(Span::styled(" · ", styles::text_muted()));
            spans.push(Span::styled(label, style));
        }
        if session.scroll_offset() > 0 {
            spans.push(Span::styled(
                format!(" ↑{}", session.scroll_offset()),
                styles::status_yellow(),
            ));
        }
        spans.push(Span::raw(" "));
        Line::from(spans)
    }
}

/// Rows visible in a `height`-row viewport, `offset` rows up from the tail.
pub fn visible_range(total: usize, height: usize, offset: usize) -> std::ops::Range<usize> {
    let end = total.saturating_sub(offset);
    end.saturating_sub(height)..end
}

impl Widget for TerminalView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.focused).title(self.title());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let lines = self.session.lines();
        if lines.is_empty() && self.session.status() == TerminalStatus::Idle {
            Paragraph::new(Span::styled(
                "Select a service and press Enter to stream its output",
                styles::text_muted(),
            ))
            .render(inner, buf);
            return;
        }

        let range = visible_range(
            lines.len(),
            usize::from(inner.height),
            self.session.scroll_offset(),
        );
        let visible: Vec<Line> = lines
            .range(range)
            .map(|line| Line::styled(strip_ansi_codes(line), styles::text_secondary()))
            .collect();

        Paragraph::new(visible).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{stream_frames, TestTerminal};
    use procdeck_app::message::Message;
    use procdeck_app::{handler, AppState};

    fn render(state: &AppState, height: u16) -> TestTerminal {
        let mut term = TestTerminal::with_size(60, height);
        term.render_widget(TerminalView::new(&state.terminal), term.area());
        term
    }

    #[test]
    fn test_visible_range_follows_tail() {
        assert_eq!(visible_range(100, 10, 0), 90..100);
        assert_eq!(visible_range(100, 10, 5), 85..95);
        assert_eq!(visible_range(5, 10, 0), 0..5);
        assert_eq!(visible_range(5, 10, 9), 0..0);
    }

    #[test]
    fn test_idle_hint() {
        let state = AppState::default();
        assert!(render(&state, 6).buffer_contains("press Enter"));
    }

    #[test]
    fn test_streamed_lines_render_without_ansi() {
        let mut state = AppState::default();
        stream_frames(&mut state, "svc1", &["\x1b[32mready\x1b[0m\n", "listening"]);

        let term = render(&state, 8);
        assert!(term.buffer_contains("svc1"));
        assert!(term.buffer_contains("streaming"));
        assert!(term.buffer_contains("ready"));
        assert!(term.buffer_contains("listening"));
        assert!(!term.buffer_contains("[32m"));
    }

    #[test]
    fn test_shows_tail_when_buffer_exceeds_height() {
        let mut state = AppState::default();
        let frames: Vec<String> = (0..20).map(|i| format!("line-{:02}\n", i)).collect();
        let refs: Vec<&str> = frames.iter().map(String::as_str).collect();
        stream_frames(&mut state, "svc1", &refs);

        let term = render(&state, 6);
        assert!(term.buffer_contains("line-19"));
        assert!(!term.buffer_contains("line-10"));
    }

    #[test]
    fn test_disconnect_reason_in_title() {
        let mut state = AppState::default();
        stream_frames(&mut state, "svc1", &[]);
        let session_id = state.terminal.session_id();
        handler::update(
            &mut state,
            Message::TerminalClosed {
                session_id,
                reason: Some("connection reset".into()),
            },
        );

        assert!(render(&state, 6).buffer_contains("disconnected: connection reset"));
    }
}
