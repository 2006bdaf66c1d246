//! Upload dialog state.
//!
//! The dialog holds the path of the replacement binary. Submitting requires
//! a non-empty path and no upload already running.

use std::path::PathBuf;

use procdeck_core::ExecId;

#[derive(Debug, Clone, Default)]
pub struct UploadDialogState {
    pub exec_id: ExecId,
    /// Path typed by the user
    pub path: String,
    pub in_flight: bool,
    pub visible: bool,
}

impl UploadDialogState {
    /// Show the dialog for `exec_id`. A running upload keeps its path.
    pub fn open(&mut self, exec_id: ExecId) {
        if !self.in_flight {
            self.exec_id = exec_id;
            self.path.clear();
        }
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Replace the typed path. Ignored while an upload is running.
    pub fn set_path(&mut self, path: String) {
        if !self.in_flight {
            self.path = path;
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.in_flight && !self.path.trim().is_empty() && !self.exec_id.is_empty()
    }

    /// Mark the upload as started and return what to send.
    pub fn begin(&mut self) -> Option<(ExecId, PathBuf)> {
        if !self.can_submit() {
            return None;
        }
        self.in_flight = true;
        Some((self.exec_id.clone(), PathBuf::from(self.path.trim())))
    }

    /// Clear the in-flight flag. On success the dialog closes.
    pub fn settle(&mut self, success: bool) {
        self.in_flight = false;
        if success {
            self.path.clear();
            self.visible = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_requires_path() {
        let mut d = UploadDialogState::default();
        d.open(ExecId::from("svc1"));
        assert!(!d.can_submit());
        assert!(d.begin().is_none());

        d.set_path("./app".into());
        let (id, path) = d.begin().unwrap();
        assert_eq!(id.as_str(), "svc1");
        assert_eq!(path, PathBuf::from("./app"));
    }

    #[test]
    fn test_no_second_upload_while_in_flight() {
        let mut d = UploadDialogState::default();
        d.open(ExecId::from("svc1"));
        d.set_path("x".into());
        assert!(d.begin().is_some());
        assert!(d.begin().is_none());

        // Reopening for another service keeps the running upload's target
        d.open(ExecId::from("svc2"));
        assert_eq!(d.exec_id.as_str(), "svc1");

        d.settle(false);
        assert!(!d.in_flight);
        assert!(d.visible);
        assert!(d.begin().is_some());
    }

    #[test]
    fn test_success_closes_dialog() {
        let mut d = UploadDialogState::default();
        d.open(ExecId::from("svc1"));
        d.set_path("x".into());
        d.begin();
        d.settle(true);
        assert!(!d.visible);
        assert!(d.path.is_empty());
    }
}
