//! Application state (Model in TEA pattern)

use std::collections::BTreeSet;

use chrono::{DateTime, Local};

use procdeck_core::{DashboardInfo, ExecId, ServiceSnapshot};

use crate::config::Settings;
use crate::config_editor::ConfigEditorState;
use crate::dispatcher::Dispatcher;
use crate::log_menu::LogMenuState;
use crate::notifications::Notifications;
use crate::registry::RegistryState;
use crate::tag_colors::TagColorMap;
use crate::terminal::TerminalSession;
use crate::upload::UploadDialogState;

/// Current UI mode/screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    /// Service list, detail panel and terminal
    #[default]
    Normal,

    /// Upload dialog (binary path input)
    Upload,

    /// Remote config editor
    ConfigEditor,

    /// Log-file menu
    LogMenu,
}

impl UiMode {
    pub fn is_modal(&self) -> bool {
        !matches!(self, UiMode::Normal)
    }
}

/// Complete application state (the Model in TEA)
#[derive(Debug)]
pub struct AppState {
    pub ui_mode: UiMode,

    pub settings: Settings,

    /// Backend address shown in the header
    pub server_label: String,

    /// Title and meta-variables from `/api/config`
    pub dashboard: Option<DashboardInfo>,

    /// Meta-variable names offered as config-editor completions
    pub completions: BTreeSet<String>,

    pub registry: RegistryState,

    /// Selected service, tracked by id so it survives snapshot reordering
    selected: Option<ExecId>,

    pub tag_colors: TagColorMap,

    pub dispatcher: Dispatcher,

    pub terminal: TerminalSession,

    pub upload: UploadDialogState,

    pub config_editor: Option<ConfigEditorState>,

    pub log_menu: LogMenuState,

    pub notifications: Notifications,

    /// Time of the last applied registry snapshot
    pub last_refresh: Option<DateTime<Local>>,

    pub should_quit: bool,

    /// Advances on every tick; drives spinners
    pub animation_frame: u64,

    /// Last config-file fetch id handed out
    config_fetches: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl AppState {
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            ui_mode: UiMode::Normal,
            server_label: String::new(),
            dashboard: None,
            completions: BTreeSet::new(),
            registry: RegistryState::new(),
            selected: None,
            tag_colors: TagColorMap::new(),
            dispatcher: Dispatcher::new(),
            terminal: TerminalSession::new(settings.terminal.scrollback_lines),
            upload: UploadDialogState::default(),
            config_editor: None,
            log_menu: LogMenuState::default(),
            notifications: Notifications::new(settings.ui.toast_duration()),
            last_refresh: None,
            should_quit: false,
            animation_frame: 0,
            config_fetches: 0,
            settings,
        }
    }

    /// Id for a new config-file fetch. Never reused.
    pub fn next_config_fetch(&mut self) -> u64 {
        self.config_fetches += 1;
        self.config_fetches
    }

    /// Dashboard title, falling back to the app name.
    pub fn title(&self) -> &str {
        self.dashboard
            .as_ref()
            .map(|d| d.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("procdeck")
    }

    pub fn set_dashboard(&mut self, info: DashboardInfo) {
        self.completions = info.meta_vars.keys().cloned().collect();
        self.dashboard = Some(info);
    }

    pub fn services(&self) -> &[ServiceSnapshot] {
        self.registry.services()
    }

    pub fn selected_index(&self) -> Option<usize> {
        match &self.selected {
            Some(id) => self.registry.position(id),
            None if self.registry.is_empty() => None,
            None => Some(0),
        }
    }

    pub fn selected_service(&self) -> Option<&ServiceSnapshot> {
        self.selected_index()
            .and_then(|i| self.registry.services().get(i))
    }

    pub fn selected_exec_id(&self) -> Option<ExecId> {
        self.selected_service().map(|s| s.exec_id.clone())
    }

    pub fn select_index(&mut self, index: usize) {
        self.selected = self
            .registry
            .services()
            .get(index)
            .map(|s| s.exec_id.clone());
    }

    pub fn select_next(&mut self) {
        let len = self.registry.len();
        if len == 0 {
            return;
        }
        let next = self.selected_index().map(|i| (i + 1) % len).unwrap_or(0);
        self.select_index(next);
    }

    pub fn select_previous(&mut self) {
        let len = self.registry.len();
        if len == 0 {
            return;
        }
        let prev = self
            .selected_index()
            .map(|i| if i == 0 { len - 1 } else { i - 1 })
            .unwrap_or(0);
        self.select_index(prev);
    }

    /// Keep the selection valid after a snapshot replaced the registry.
    ///
    /// `previous_index` is where the selection sat in the old snapshot.
    pub fn reconcile_selection(&mut self, previous_index: Option<usize>) {
        if self.selected_index().is_some() && self.selected.is_some() {
            return;
        }
        let len = self.registry.len();
        if len == 0 {
            self.selected = None;
            return;
        }
        let index = previous_index.unwrap_or(0).min(len - 1);
        self.select_index(index);
    }

    /// Display name for a service, falling back to its id.
    pub fn service_label(&self, exec_id: &ExecId) -> String {
        self.registry
            .find(exec_id)
            .map(|s| s.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| exec_id.to_string())
    }

    /// Whether the lifecycle controls for `exec_id` are disabled.
    pub fn is_loading(&self, exec_id: &ExecId) -> bool {
        self.dispatcher.is_loading(exec_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procdeck_client::test_utils::test_service;

    fn state_with(ids: &[&str]) -> AppState {
        let mut state = AppState::default();
        let seq = state.registry.issue();
        state
            .registry
            .apply(seq, Ok(ids.iter().map(|id| test_service(id, id)).collect()));
        state
    }

    #[test]
    fn test_default_selection_is_first() {
        let state = state_with(&["a", "b"]);
        assert_eq!(state.selected_index(), Some(0));
        assert_eq!(state.selected_exec_id(), Some(ExecId::from("a")));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut state = state_with(&["a", "b", "c"]);
        state.select_previous();
        assert_eq!(state.selected_exec_id(), Some(ExecId::from("c")));
        state.select_next();
        assert_eq!(state.selected_exec_id(), Some(ExecId::from("a")));
    }

    #[test]
    fn test_selection_follows_id_across_reorder() {
        let mut state = state_with(&["a", "b", "c"]);
        state.select_index(1);
        let seq = state.registry.issue();
        state.registry.apply(
            seq,
            Ok(vec![test_service("c", "c"), test_service("b", "b")]),
        );
        state.reconcile_selection(Some(1));
        assert_eq!(state.selected_exec_id(), Some(ExecId::from("b")));
    }

    #[test]
    fn test_selection_clamps_when_service_disappears() {
        let mut state = state_with(&["a", "b", "c"]);
        state.select_index(2);
        let seq = state.registry.issue();
        state.registry.apply(seq, Ok(vec![test_service("a", "a")]));
        state.reconcile_selection(Some(2));
        assert_eq!(state.selected_exec_id(), Some(ExecId::from("a")));
    }

    #[test]
    fn test_title_falls_back() {
        let mut state = AppState::default();
        assert_eq!(state.title(), "procdeck");
        state.set_dashboard(DashboardInfo {
            name: "prod fleet".into(),
            meta_vars: [("$HOST".to_string(), "x".to_string())].into_iter().collect(),
        });
        assert_eq!(state.title(), "prod fleet");
        assert!(state.completions.contains("$HOST"));
    }
}
