//! Key hints for the current mode.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget},
};

use procdeck_app::state::{AppState, UiMode};

use super::hint_line;

pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hints: &[(&str, &str)] = match self.state.ui_mode {
            UiMode::Normal if self.state.terminal.is_active() => &[
                ("j/k", "move"),
                ("s", "start/stop"),
                ("r", "restart"),
                ("PgUp/PgDn", "scroll"),
                ("x", "clear"),
                ("Esc", "detach"),
                ("q", "quit"),
            ],
            UiMode::Normal => &[
                ("j/k", "move"),
                ("s", "start/stop"),
                ("r", "restart"),
                ("u", "upload"),
                ("c", "config"),
                ("l", "logs"),
                ("t", "output"),
                ("q", "quit"),
            ],
            // Modals draw their own hints
            UiMode::Upload | UiMode::ConfigEditor | UiMode::LogMenu => &[("Esc", "close")],
        };
        Paragraph::new(hint_line(hints)).render(area, buf);
    }
}
