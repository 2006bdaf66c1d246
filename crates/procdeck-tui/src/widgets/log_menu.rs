//! Log-file menu for one service.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use procdeck_app::log_menu::LogMenuState;
use procdeck_core::format_bytes;

use super::{hint_line, modal_overlay, truncate_to_width};
use crate::theme::styles;

const MENU_WIDTH: u16 = 56;

pub struct LogMenu<'a> {
    menu: &'a LogMenuState,
    label: &'a str,
}

impl<'a> LogMenu<'a> {
    pub fn new(menu: &'a LogMenuState, label: &'a str) -> Self {
        Self { menu, label }
    }

    fn body(&self, width: usize, rows: usize) -> Vec<Line<'static>> {
        if self.menu.loading {
            return vec![Line::styled("Loading…", styles::text_muted())];
        }
        if self.menu.files.is_empty() {
            return vec![Line::styled("No log files", styles::text_muted())];
        }

        // Keep the selection in view
        let first = self.menu.selected.saturating_sub(rows.saturating_sub(1));
        self.menu
            .files
            .iter()
            .enumerate()
            .skip(first)
            .take(rows)
            .map(|(i, file)| {
                let size = format_bytes(file.size_bytes);
                let name_width = width.saturating_sub(size.len() + 1);
                let name = truncate_to_width(&file.name, name_width);
                let pad = width.saturating_sub(
                    unicode_width::UnicodeWidthStr::width(name.as_str()) + size.len(),
                );
                let text = format!("{}{}{}", name, " ".repeat(pad), size);
                if i == self.menu.selected {
                    Line::styled(text, styles::focused_selected())
                } else {
                    Line::from(vec![Span::styled(text, styles::text_primary())])
                }
            })
            .collect()
    }
}

impl Widget for LogMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.menu.files.len().clamp(1, 12) as u16;
        let modal = modal_overlay::centered_rect(MENU_WIDTH, rows + 4, area);
        modal_overlay::prepare(buf, area, modal);

        let block = styles::modal_block(format!(" Logs · {} ", self.label));
        let inner = block.inner(modal);
        block.render(modal, buf);
        if inner.height < 2 || inner.width == 0 {
            return;
        }

        let list_area = Rect {
            height: inner.height - 1,
            ..inner
        };
        let hint_area = Rect {
            y: inner.bottom() - 1,
            height: 1,
            ..inner
        };

        Paragraph::new(self.body(usize::from(inner.width), usize::from(list_area.height)))
            .render(list_area, buf);
        Paragraph::new(hint_line(&[
            ("Enter", "open"),
            ("d", "download"),
            ("Esc", "close"),
        ]))
        .render(hint_area, buf);
    }
}
