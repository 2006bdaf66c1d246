//! Transient notifications stacked in the bottom-right corner.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget},
};

use procdeck_app::notifications::{NotificationLevel, Notifications};

use super::truncate_to_width;
use crate::theme::{palette, styles};

const MAX_TOAST_WIDTH: u16 = 60;

pub struct Toasts<'a> {
    notifications: &'a Notifications,
}

impl<'a> Toasts<'a> {
    pub fn new(notifications: &'a Notifications) -> Self {
        Self { notifications }
    }
}

fn icon(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Success => "✓",
        NotificationLevel::Info => "i",
        NotificationLevel::Error => "✗",
    }
}

impl Widget for Toasts<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.notifications.is_empty() || area.width < 6 || area.height == 0 {
            return;
        }

        let width = MAX_TOAST_WIDTH.min(area.width);
        let text_width = usize::from(width).saturating_sub(4);

        // Newest at the bottom
        let toasts: Vec<_> = self.notifications.iter().collect();
        let shown = toasts.len().min(usize::from(area.height));
        for (i, toast) in toasts[toasts.len() - shown..].iter().enumerate() {
            let y = area.bottom() - (shown - i) as u16;
            let row = Rect::new(area.right() - width, y, width, 1);
            Clear.render(row, buf);

            let line = Line::from(vec![
                Span::styled(format!(" {} ", icon(toast.level)), styles::notification(toast.level)),
                Span::styled(
                    truncate_to_width(&toast.message, text_width),
                    styles::text_primary(),
                ),
            ])
            .style(ratatui::style::Style::default().bg(palette::POPUP_BG));
            Paragraph::new(line).render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use std::time::Duration;

    #[test]
    fn test_renders_newest_last() {
        let mut notifications = Notifications::new(Duration::from_secs(3));
        notifications.success("Started api");
        notifications.error("exec not found");

        let mut term = TestTerminal::with_size(60, 5);
        term.render_widget(Toasts::new(&notifications), term.area());

        let content = term.content();
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines[3].contains("✓ Started api"));
        assert!(lines[4].contains("✗ exec not found"));
    }

    #[test]
    fn test_nothing_when_empty() {
        let notifications = Notifications::new(Duration::from_secs(3));
        let mut term = TestTerminal::with_size(60, 5);
        term.render_widget(Toasts::new(&notifications), term.area());
        assert_eq!(term.content().trim(), "");
    }
}
