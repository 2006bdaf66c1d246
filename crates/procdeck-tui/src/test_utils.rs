//! Test utilities for TUI rendering verification
//!
//! Widgets and full frames are rendered into ratatui's `TestBackend` and
//! asserted on as plain text.

use procdeck_app::message::Message;
use procdeck_app::state::AppState;
use procdeck_app::handler;
use procdeck_core::{ExecId, ServiceSnapshot};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::{Frame, Terminal};

pub use procdeck_app::test_utils::{test_service, test_service_running};

/// Standard test terminal size
pub const TEST_WIDTH: u16 = 100;
pub const TEST_HEIGHT: u16 = 30;

/// Wrapper around a `TestBackend` terminal.
pub struct TestTerminal {
    pub terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    pub fn new() -> Self {
        Self::with_size(TEST_WIDTH, TEST_HEIGHT)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let terminal =
            Terminal::new(TestBackend::new(width, height)).expect("Failed to create test terminal");
        Self { terminal }
    }

    pub fn area(&self) -> Rect {
        let size = self.terminal.size().expect("Failed to get terminal size");
        Rect::new(0, 0, size.width, size.height)
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        self.terminal
            .draw(|frame| frame.render_widget(widget, area))
            .expect("Failed to render widget");
    }

    /// Draw a full frame, e.g. `render::view`.
    pub fn draw_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f).expect("Failed to draw frame");
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    pub fn buffer_contains(&self, text: &str) -> bool {
        self.content().contains(text)
    }

    /// Whole screen as text, one line per row.
    pub fn content(&self) -> String {
        let buffer = self.buffer();
        let mut result = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                result.push_str(buffer[(x, y)].symbol());
            }
            result.push('\n');
        }
        result
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new()
    }
}

/// AppState with `services` applied as the current snapshot.
pub fn state_with_services(services: Vec<ServiceSnapshot>) -> AppState {
    let mut state = AppState::default();
    let seq = state.registry.issue();
    handler::update(
        &mut state,
        Message::RegistryFetched {
            seq,
            result: Ok(services),
        },
    );
    state
}

/// Bind the terminal to `exec_id` and feed it `frames` as if streamed.
pub fn stream_frames(state: &mut AppState, exec_id: &str, frames: &[&str]) {
    handler::update(state, Message::TerminalSelect(ExecId::from(exec_id)));
    let session_id = state.terminal.session_id();
    handler::update(state, Message::TerminalConnected { session_id });
    for frame in frames {
        handler::update(
            state,
            Message::TerminalFrame {
                session_id,
                text: frame.to_string(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_buffer_contains() {
        let mut term = TestTerminal::with_size(20, 3);
        term.render_widget(Paragraph::new("Hello World"), term.area());
        assert!(term.buffer_contains("Hello World"));
        assert!(!term.buffer_contains("Goodbye"));
    }

    #[test]
    fn test_state_with_services() {
        let state = state_with_services(vec![test_service("a", "alpha")]);
        assert_eq!(state.services().len(), 1);
        assert_eq!(state.selected_index(), Some(0));
    }
}
