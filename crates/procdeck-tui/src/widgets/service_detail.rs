//! Detail panel for the selected service.
//!
//! Metrics are point-in-time values that only mean something while the
//! process runs, so a stopped service shows none of them.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use procdeck_core::{format_bytes, format_percent, ServiceSnapshot};

use crate::theme::styles;

pub struct ServiceDetail<'a> {
    service: Option<&'a ServiceSnapshot>,
}

impl<'a> ServiceDetail<'a> {
    pub fn new(service: Option<&'a ServiceSnapshot>) -> Self {
        Self { service }
    }
}

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<9}", label), styles::text_muted()),
        Span::styled(value, styles::text_primary()),
    ])
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn lines_for(service: &ServiceSnapshot) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(service.exec_id.to_string(), styles::accent_bold()),
        Span::raw("  "),
        if service.running {
            Span::styled("running", styles::status_green())
        } else {
            Span::styled("stopped", styles::status_red())
        },
    ])];

    if let Some(pid) = service.pid() {
        lines.push(field("pid", pid.to_string()));
    }
    if let Some(bytes) = service.memory_bytes() {
        lines.push(field("memory", format_bytes(bytes)));
    }
    if let Some(cpu) = service.cpu_percent() {
        lines.push(field("cpu", format_percent(cpu)));
    }
    if let Some(handles) = service.open_handle_count() {
        lines.push(field("handles", handles.to_string()));
    }
    if service.running {
        lines.push(field("listen", join_or_dash(&service.listen_addresses)));
        lines.push(field("watching", join_or_dash(&service.watched_paths)));
    }
    if let Some(path) = service.config_file_path.as_deref().filter(|p| !p.is_empty()) {
        lines.push(field("config", path.to_string()));
    }
    lines
}

impl Widget for ServiceDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.service {
            Some(service) if !service.name.is_empty() => format!(" {} ", service.name),
            _ => " Details ".to_string(),
        };
        let block = styles::glass_block(false).title(title);

        let lines = match self.service {
            Some(service) => lines_for(service),
            None => vec![Line::styled("No service selected", styles::text_muted())],
        };

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
