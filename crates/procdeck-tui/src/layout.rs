//! Screen layout definitions for the TUI
//!
//! ```text
//! ┌ header ───────────────────────────────┐
//! ├ services ──┬ detail ──────────────────┤
//! │            ├ terminal ────────────────┤
//! │            │                          │
//! └────────────┴──────────────────────────┘
//!   status bar
//! ```

use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the service list column
const SERVICE_LIST_WIDTH: u16 = 34;

/// Height of the detail panel (borders included)
const DETAIL_HEIGHT: u16 = 9;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub header: Rect,
    pub services: Rect,
    pub detail: Rect,
    pub terminal: Rect,
    pub status: Rect,
}

/// Split the screen into the dashboard areas.
///
/// Narrow terminals give the service list a third of the width.
pub fn create(area: Rect) -> ScreenAreas {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(4),
        Constraint::Length(1),
    ])
    .areas(area);

    let list_width = SERVICE_LIST_WIDTH.min(body.width / 3).max(1);
    let [services, right] =
        Layout::horizontal([Constraint::Length(list_width), Constraint::Min(10)]).areas(body);

    let detail_height = DETAIL_HEIGHT.min(right.height / 2);
    let [detail, terminal] =
        Layout::vertical([Constraint::Length(detail_height), Constraint::Min(3)]).areas(right);

    ScreenAreas {
        header,
        services,
        detail,
        terminal,
        status,
    }
}

impl ScreenAreas {
    /// Toast stack: the bottom of the body, right-aligned by the widget.
    pub fn toasts(&self) -> Rect {
        let top = self.header.bottom();
        let height = self.status.y.saturating_sub(top).min(5);
        Rect::new(
            self.header.x,
            self.status.y - height,
            self.header.width,
            height,
        )
    }
}

/// Rows and columns inside a bordered area.
pub fn inner_size(area: Rect) -> (u16, u16) {
    (area.width.saturating_sub(2), area.height.saturating_sub(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout() {
        let layout = create(Rect::new(0, 0, 120, 40));

        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.status.y, 39);
        assert_eq!(layout.services.width, SERVICE_LIST_WIDTH);
        assert_eq!(layout.detail.height, DETAIL_HEIGHT);
        assert_eq!(layout.terminal.y, layout.detail.y + DETAIL_HEIGHT);
    }

    #[test]
    fn test_areas_fill_height() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = create(area);
        assert_eq!(
            layout.header.height + layout.services.height + layout.status.height,
            area.height
        );
        assert_eq!(
            layout.detail.height + layout.terminal.height,
            layout.services.height
        );
    }

    #[test]
    fn test_narrow_terminal_shrinks_list() {
        let layout = create(Rect::new(0, 0, 60, 24));
        assert_eq!(layout.services.width, 20);
        assert_eq!(layout.services.width + layout.terminal.width, 60);
    }

    #[test]
    fn test_toast_area_sits_above_status_bar() {
        let layout = create(Rect::new(0, 0, 80, 24));
        let toasts = layout.toasts();
        assert_eq!(toasts.bottom(), layout.status.y);
        assert_eq!(toasts.height, 5);
    }

    #[test]
    fn test_inner_size_saturates() {
        assert_eq!(inner_size(Rect::new(0, 0, 1, 1)), (0, 0));
        assert_eq!(inner_size(Rect::new(0, 0, 10, 5)), (8, 3));
    }
}
