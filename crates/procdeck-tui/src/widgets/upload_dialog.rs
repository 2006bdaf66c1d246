//! Upload dialog: path input for a replacement binary.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use procdeck_app::upload::UploadDialogState;

use super::{hint_line, modal_overlay, truncate_left_to_width};
use crate::theme::styles;

const DIALOG_WIDTH: u16 = 64;
const DIALOG_HEIGHT: u16 = 7;

pub struct UploadDialog<'a> {
    upload: &'a UploadDialogState,
    label: &'a str,
}

impl<'a> UploadDialog<'a> {
    /// `label` is the display name of the target service.
    pub fn new(upload: &'a UploadDialogState, label: &'a str) -> Self {
        Self { upload, label }
    }
}

impl Widget for UploadDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = modal_overlay::centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        modal_overlay::prepare(buf, area, modal);

        let block = styles::modal_block(format!(" Upload binary · {} ", self.label));
        let inner = block.inner(modal);
        block.render(modal, buf);
        if inner.height == 0 || inner.width < 4 {
            return;
        }

        // "> path█" scrolled so the cursor stays visible
        let input_width = usize::from(inner.width).saturating_sub(3);
        let path = truncate_left_to_width(&self.upload.path, input_width);
        let mut input = vec![Span::styled("> ", styles::accent()), Span::styled(path, styles::text_primary())];
        if !self.upload.in_flight {
            input.push(Span::styled("█", styles::accent()));
        }

        let status = if self.upload.in_flight {
            Line::from(Span::styled("Uploading…", styles::status_yellow()))
        } else if self.upload.path.trim().is_empty() {
            Line::from(Span::styled(
                "Path to the new executable",
                styles::text_muted(),
            ))
        } else {
            Line::default()
        };

        let lines = vec![
            status,
            Line::from(input),
            Line::default(),
            hint_line(&[("Enter", "upload"), ("Ctrl+U", "clear"), ("Esc", "cancel")]),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}
