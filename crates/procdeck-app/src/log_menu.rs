//! Log-file menu for one service.

use procdeck_core::{ExecId, LogFile};

#[derive(Debug, Clone, Default)]
pub struct LogMenuState {
    pub exec_id: ExecId,
    pub files: Vec<LogFile>,
    pub selected: usize,
    pub loading: bool,
    pub visible: bool,
}

impl LogMenuState {
    /// Show the menu and start loading. Files are fetched on every open.
    pub fn open(&mut self, exec_id: ExecId) {
        self.exec_id = exec_id;
        self.files.clear();
        self.selected = 0;
        self.loading = true;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Apply a fetch result; ignored if the menu moved on to another service.
    pub fn loaded(&mut self, exec_id: &ExecId, files: Vec<LogFile>) -> bool {
        if &self.exec_id != exec_id || !self.loading {
            return false;
        }
        self.files = files;
        self.selected = 0;
        self.loading = false;
        true
    }

    pub fn failed(&mut self, exec_id: &ExecId) -> bool {
        self.loaded(exec_id, Vec::new())
    }

    pub fn select_next(&mut self) {
        if !self.files.is_empty() {
            self.selected = (self.selected + 1) % self.files.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.files.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.files.len() - 1);
        }
    }

    pub fn selected_file(&self) -> Option<&LogFile> {
        self.files.get(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> LogFile {
        LogFile {
            name: name.to_string(),
            size_bytes: 10,
        }
    }

    #[test]
    fn test_selection_wraps() {
        let mut m = LogMenuState::default();
        m.open(ExecId::from("svc1"));
        m.loaded(&ExecId::from("svc1"), vec![file("a.log"), file("b.log")]);
        assert_eq!(m.selected_file().unwrap().name, "a.log");
        m.select_previous();
        assert_eq!(m.selected_file().unwrap().name, "b.log");
        m.select_next();
        assert_eq!(m.selected_file().unwrap().name, "a.log");
    }

    #[test]
    fn test_failure_gives_empty_menu() {
        let mut m = LogMenuState::default();
        m.open(ExecId::from("svc1"));
        assert!(m.failed(&ExecId::from("svc1")));
        assert!(m.files.is_empty());
        assert!(!m.loading);
        assert!(m.selected_file().is_none());
    }

    #[test]
    fn test_result_for_other_service_ignored() {
        let mut m = LogMenuState::default();
        m.open(ExecId::from("svc1"));
        m.open(ExecId::from("svc2"));
        assert!(!m.loaded(&ExecId::from("svc1"), vec![file("a.log")]));
        assert!(m.loading);
    }
}
