//! Terminal-independent key events.
//!
//! The TUI converts crossterm events into [`InputKey`] at its boundary so the
//! key handlers in this crate can be driven from tests and the headless
//! runner without a terminal backend.

/// A key press as seen by the handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKey {
    /// Printable character
    Char(char),
    /// Character with Ctrl held (Ctrl+C, Ctrl+S, ...)
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,

    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,

    /// Function key F1-F12
    F(u8),
}

impl InputKey {
    /// True for keys that move a list selection down.
    pub fn is_down(&self) -> bool {
        matches!(self, InputKey::Down | InputKey::Char('j'))
    }

    /// True for keys that move a list selection up.
    pub fn is_up(&self) -> bool {
        matches!(self, InputKey::Up | InputKey::Char('k'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_differs_from_plain_char() {
        assert_ne!(InputKey::CharCtrl('c'), InputKey::Char('c'));
    }

    #[test]
    fn test_vim_and_arrow_navigation() {
        assert!(InputKey::Char('j').is_down());
        assert!(InputKey::Down.is_down());
        assert!(InputKey::Char('k').is_up());
        assert!(!InputKey::Char('x').is_up());
    }
}
