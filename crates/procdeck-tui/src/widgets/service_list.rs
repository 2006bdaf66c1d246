//! Service list: one row per managed process.
//!
//! `● name [category] ⠋`: the dot shows `running`, the category is colored
//! from the session tag map, and a spinner marks services with a command in
//! flight.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use procdeck_app::state::AppState;
use procdeck_core::ServiceSnapshot;

use super::{spinner, truncate_to_width};
use crate::theme::{palette, styles};

pub struct ServiceList<'a> {
    state: &'a AppState,
    focused: bool,
}

impl<'a> ServiceList<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            focused: true,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn row(&self, service: &ServiceSnapshot, width: usize) -> ListItem<'static> {
        let (dot, dot_style) = if service.running {
            ("●", styles::status_green())
        } else {
            ("○", styles::status_red())
        };

        let mut spans = vec![Span::styled(dot, dot_style), Span::raw(" ")];
        let mut used = 2;

        let tag = service.category().map(|category| {
            let style = match self.state.tag_colors.get(category) {
                Some(color) => Style::default().fg(palette::tag_color(color)),
                None => styles::text_muted(),
            };
            (format!(" [{}]", category), style)
        });
        let tag_width = tag
            .as_ref()
            .map(|(text, _)| unicode_width::UnicodeWidthStr::width(text.as_str()))
            .unwrap_or(0);
        let loading = self.state.is_loading(&service.exec_id);
        let spinner_width = if loading { 2 } else { 0 };

        let label = if service.name.is_empty() {
            service.exec_id.to_string()
        } else {
            service.name.clone()
        };
        let name_width = width.saturating_sub(used + tag_width + spinner_width);
        let name = truncate_to_width(&label, name_width);
        used += unicode_width::UnicodeWidthStr::width(name.as_str());
        spans.push(Span::styled(name, styles::text_primary()));

        if let Some((text, style)) = tag {
            if used + tag_width + spinner_width <= width {
                spans.push(Span::styled(text, style));
            }
        }
        if loading {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                spinner(self.state.animation_frame),
                styles::status_yellow(),
            ));
        }

        ListItem::new(Line::from(spans))
    }
}

impl Widget for ServiceList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = self.state.services().len();
        let block = styles::glass_block(self.focused).title(format!(" Services ({}) ", count));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if count == 0 {
            let text = if self.state.registry.is_loaded() {
                "No services"
            } else {
                "Loading…"
            };
            Paragraph::new(Span::styled(text, styles::text_muted())).render(inner, buf);
            return;
        }

        let width = usize::from(inner.width);
        let items: Vec<ListItem> = self
            .state
            .services()
            .iter()
            .map(|service| self.row(service, width))
            .collect();

        let list = List::new(items).highlight_style(styles::selected_row());
        let mut list_state = ListState::default().with_selected(self.state.selected_index());
        StatefulWidget::render(list, inner, buf, &mut list_state);
    }
}
