//! Header bar: dashboard title, backend address and poll status.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use procdeck_app::state::AppState;

use crate::theme::{palette, styles};

pub struct DashboardHeader<'a> {
    state: &'a AppState,
}

impl<'a> DashboardHeader<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Poll status: dot, label and style.
    fn poll_status(&self) -> (&'static str, String, Style) {
        let registry = &self.state.registry;
        if let Some(error) = registry.last_error() {
            return ("●", format!("offline: {}", error), styles::status_red());
        }
        if !registry.is_loaded() {
            return ("○", "connecting".to_string(), styles::text_muted());
        }
        let every = self.state.settings.server.poll_interval().as_millis();
        let label = match self.state.last_refresh {
            Some(at) => format!("every {}ms · {}", every, at.format("%H:%M:%S")),
            None => format!("every {}ms", every),
        };
        ("●", label, styles::status_green())
    }
}

impl Widget for DashboardHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let (dot, status, status_style) = self.poll_status();
        let mut left = vec![
            Span::raw(" "),
            Span::styled(self.state.title().to_string(), styles::accent_bold()),
        ];
        if !self.state.server_label.is_empty() {
            left.push(Span::styled(" / ", styles::text_muted()));
            left.push(Span::styled(
                self.state.server_label.clone(),
                styles::text_secondary(),
            ));
        }
        let left = Line::from(left);

        let right = Line::from(vec![
            Span::styled(dot, status_style),
            Span::raw(" "),
            Span::styled(status, Style::default().fg(palette::TEXT_SECONDARY)),
            Span::raw(" "),
        ]);

        Paragraph::new(left).render(inner, buf);

        let right_width = right.width() as u16;
        let left_width = Line::from(self.state.title()).width() as u16 + 2;
        if right_width + left_width < inner.width {
            let right_area = Rect {
                x: inner.right() - right_width,
                width: right_width,
                ..inner
            };
            Paragraph::new(right).render(right_area, buf);
        }
    }
}
