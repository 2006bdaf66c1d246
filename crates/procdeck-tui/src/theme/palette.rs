//! Color palette.

use procdeck_app::TagColor;
use ratatui::style::Color;

// --- Background layers ---
pub const DEEPEST_BG: Color = Color::Black;
pub const CARD_BG: Color = Color::Black;
pub const POPUP_BG: Color = Color::Rgb(28, 33, 43);
pub const SELECTED_BG: Color = Color::Rgb(40, 48, 62);

// --- Borders ---
pub const BORDER_DIM: Color = Color::DarkGray;
pub const BORDER_ACTIVE: Color = Color::Cyan;

// --- Accent ---
pub const ACCENT: Color = Color::Cyan;

// --- Text ---
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Gray;
pub const TEXT_MUTED: Color = Color::DarkGray;
pub const CONTRAST_FG: Color = Color::Black;

// --- Status ---
pub const STATUS_GREEN: Color = Color::Green;
pub const STATUS_RED: Color = Color::Red;
pub const STATUS_YELLOW: Color = Color::Yellow;
pub const STATUS_BLUE: Color = Color::Blue;

// --- Effects ---
pub const SHADOW: Color = Color::Rgb(5, 6, 8);

// --- Editor ---
pub const CURSOR_BG: Color = Color::Gray;
pub const LINE_NUMBER: Color = Color::DarkGray;

/// Terminal color for a category palette entry.
pub fn tag_color(color: TagColor) -> Color {
    match color {
        TagColor::Blue => Color::Blue,
        TagColor::Cyan => Color::Cyan,
        TagColor::Green => Color::Green,
        TagColor::Yellow => Color::Yellow,
        TagColor::Magenta => Color::Magenta,
        TagColor::Orange => Color::Rgb(255, 140, 0),
        TagColor::Teal => Color::Rgb(0, 128, 128),
    }
}
