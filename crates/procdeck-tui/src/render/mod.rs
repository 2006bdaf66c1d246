//! Main render/view function (View in TEA pattern)

#[cfg(test)]
mod tests;

use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use procdeck_app::state::{AppState, UiMode};

use crate::layout::{self, ScreenAreas};
use crate::theme::palette;
use crate::widgets;

/// Render the complete UI (View function in TEA)
///
/// Pure with respect to `state`: sizing feedback for the terminal pane goes
/// back through a message from the runner.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    let areas = layout::create(area);
    render_dashboard(frame, state, &areas);

    match state.ui_mode {
        UiMode::Normal => {}
        UiMode::Upload => {
            let label = state.service_label(&state.upload.exec_id);
            frame.render_widget(widgets::UploadDialog::new(&state.upload, &label), area);
        }
        UiMode::ConfigEditor => {
            if let Some(editor) = &state.config_editor {
                let label = state.service_label(&editor.exec_id);
                frame.render_widget(widgets::ConfigEditorView::new(editor, &label), area);
            }
        }
        UiMode::LogMenu => {
            let label = state.service_label(&state.log_menu.exec_id);
            frame.render_widget(widgets::LogMenu::new(&state.log_menu, &label), area);
        }
    }

    // Toasts stay on top of modals
    frame.render_widget(widgets::Toasts::new(&state.notifications), areas.toasts());
}

fn render_dashboard(frame: &mut Frame, state: &AppState, areas: &ScreenAreas) {
    let terminal_focused = state.terminal.is_active();

    frame.render_widget(widgets::DashboardHeader::new(state), areas.header);
    frame.render_widget(
        widgets::ServiceList::new(state).focused(!terminal_focused),
        areas.services,
    );
    frame.render_widget(
        widgets::ServiceDetail::new(state.selected_service()),
        areas.detail,
    );
    frame.render_widget(
        widgets::TerminalView::new(&state.terminal).focused(terminal_focused),
        areas.terminal,
    );
    frame.render_widget(widgets::StatusBar::new(state), areas.status);
}
