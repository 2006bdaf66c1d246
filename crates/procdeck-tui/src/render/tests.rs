//! Full-frame rendering tests

use procdeck_app::message::Message;
use procdeck_app::state::{AppState, UiMode};
use procdeck_app::{handler, BusEvent};
use procdeck_core::ExecId;

use super::view;
use crate::test_utils::{
    state_with_services, stream_frames, test_service, test_service_running, TestTerminal,
};

fn draw(state: &AppState) -> TestTerminal {
    let mut term = TestTerminal::new();
    term.draw_with(|frame| view(frame, state));
    term
}

fn dashboard() -> AppState {
    let mut api = test_service_running("api", "api", "web");
    api.memory_bytes = 3 * 1024 * 1024;
    api.config_file_path = Some("api.yaml".into());
    state_with_services(vec![api, test_service("db", "postgres")])
}

#[test]
fn test_dashboard_renders_all_panels() {
    let term = draw(&dashboard());

    assert!(term.buffer_contains("procdeck"));
    assert!(term.buffer_contains("Services (2)"));
    assert!(term.buffer_contains("postgres"));
    assert!(term.buffer_contains("3.0 MB"));
    assert!(term.buffer_contains("Terminal"));
    assert!(term.buffer_contains("[q] quit"));
}

#[test]
fn test_detail_follows_selection() {
    let mut state = dashboard();
    handler::update(&mut state, Message::SelectNext);

    let term = draw(&state);
    assert!(term.buffer_contains("stopped"));
    assert!(!term.buffer_contains("3.0 MB"));
}

#[test]
fn test_upload_mode_shows_dialog() {
    let mut state = dashboard();
    handler::update(&mut state, Message::UploadDialogOpened(ExecId::from("api")));
    assert_eq!(state.ui_mode, UiMode::Upload);

    assert!(draw(&state).buffer_contains("Upload binary · api"));
}

#[test]
fn test_config_editor_mode_shows_text() {
    let mut state = dashboard();
    handler::update(&mut state, Message::ConfigEditorOpened(ExecId::from("api")));
    let fetch_id = state.config_editor.as_ref().map_or(0, |e| e.fetch_id);
    handler::update(
        &mut state,
        Message::ConfigFileLoaded {
            exec_id: ExecId::from("api"),
            fetch_id,
            text: "listen: :8080".into(),
        },
    );

    let term = draw(&state);
    assert!(term.buffer_contains("Config · api"));
    assert!(term.buffer_contains("listen: :8080"));
}

#[test]
fn test_log_menu_mode() {
    let mut state = dashboard();
    handler::update(&mut state, Message::OpenLogMenu(ExecId::from("db")));
    assert!(draw(&state).buffer_contains("Logs · postgres"));
}

#[test]
fn test_terminal_stream_visible() {
    let mut state = dashboard();
    stream_frames(&mut state, "api", &["booting\n", "ready"]);

    let term = draw(&state);
    assert!(term.buffer_contains("connected to api"));
    assert!(term.buffer_contains("ready"));
    assert!(term.buffer_contains("detach"));
}

#[test]
fn test_toast_rendered_over_dashboard() {
    let mut state = dashboard();
    state.notifications.error("exec not found");
    assert!(draw(&state).buffer_contains("exec not found"));
}

#[test]
fn test_publish_without_engine_is_inert() {
    // Publishing only yields an action; surfaces open once the engine
    // routes it through the bus.
    let mut state = dashboard();
    handler::update(
        &mut state,
        Message::Publish(BusEvent::OpenUpload(ExecId::from("api"))),
    );
    assert_eq!(state.ui_mode, UiMode::Normal);
}

#[test]
fn test_tiny_terminal_does_not_panic() {
    let state = dashboard();
    let mut term = TestTerminal::with_size(10, 4);
    term.draw_with(|frame| view(frame, &state));

    let mut state = dashboard();
    handler::update(&mut state, Message::ConfigEditorOpened(ExecId::from("api")));
    term.draw_with(|frame| view(frame, &state));
}
