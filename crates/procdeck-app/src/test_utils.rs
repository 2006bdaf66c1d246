//! Test utilities for the app layer
//!
//! [`FakeBackend`] is an in-memory [`Backend`] that records every call, so
//! engine and dispatcher behavior can be tested without a server.

use std::collections::HashMap;
use std::sync::Mutex;

use procdeck_client::Backend;
use procdeck_core::prelude::*;
use procdeck_core::{DashboardInfo, ExecId, LogFile, ServiceSnapshot};

pub use procdeck_client::test_utils::{test_service, test_service_running};

/// How a faked call should fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeFailure {
    /// `{error}` envelope from the backend
    Backend(String),
    /// Request never got an answer
    Transport(String),
}

impl FakeFailure {
    fn to_error(&self) -> Error {
        match self {
            FakeFailure::Backend(message) => Error::backend(message.clone()),
            FakeFailure::Transport(message) => Error::transport(message.clone()),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    services: Vec<ServiceSnapshot>,
    list_failure: Option<FakeFailure>,
    command_failure: Option<FakeFailure>,
    dashboard: DashboardInfo,
    config_text: String,
    log_files: Vec<LogFile>,
    log_contents: HashMap<String, Vec<u8>>,
    output_base: String,
    calls: Vec<String>,
    uploads: Vec<(ExecId, Vec<u8>)>,
    saved_configs: Vec<(ExecId, String)>,
}

/// In-memory backend.
#[derive(Debug)]
pub struct FakeBackend {
    inner: Mutex<Inner>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                output_base: "ws://127.0.0.1:1".to_string(),
                ..Default::default()
            }),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut inner = self.inner.lock().expect("fake backend lock");
        f(&mut inner)
    }

    fn record(&self, call: String) {
        self.with(|i| i.calls.push(call));
    }

    pub fn set_services(&self, services: Vec<ServiceSnapshot>) {
        self.with(|i| i.services = services);
    }

    pub fn fail_list(&self, failure: Option<FakeFailure>) {
        self.with(|i| i.list_failure = failure);
    }

    pub fn fail_commands(&self, failure: Option<FakeFailure>) {
        self.with(|i| i.command_failure = failure);
    }

    pub fn set_dashboard(&self, info: DashboardInfo) {
        self.with(|i| i.dashboard = info);
    }

    pub fn set_config_text(&self, text: &str) {
        self.with(|i| i.config_text = text.to_string());
    }

    pub fn set_log_files(&self, files: Vec<LogFile>) {
        self.with(|i| i.log_files = files);
    }

    pub fn set_log_content(&self, name: &str, content: &[u8]) {
        self.with(|i| {
            i.log_contents.insert(name.to_string(), content.to_vec());
        });
    }

    /// `ws://host:port` used to build output stream URLs.
    pub fn set_output_base(&self, base: &str) {
        self.with(|i| i.output_base = base.to_string());
    }

    /// Every call so far, e.g. `"start svc1"`.
    pub fn calls(&self) -> Vec<String> {
        self.with(|i| i.calls.clone())
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.with(|i| i.calls.iter().filter(|c| c.starts_with(prefix)).count())
    }

    pub fn uploads(&self) -> Vec<(ExecId, Vec<u8>)> {
        self.with(|i| i.uploads.clone())
    }

    pub fn saved_configs(&self) -> Vec<(ExecId, String)> {
        self.with(|i| i.saved_configs.clone())
    }

    fn command(&self, verb: &str, exec_id: &ExecId) -> Result<()> {
        self.record(format!("{verb} {exec_id}"));
        match self.with(|i| i.command_failure.clone()) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

impl Backend for FakeBackend {
    async fn list_services(&self) -> Result<Vec<ServiceSnapshot>> {
        self.record("list".to_string());
        self.with(|i| match &i.list_failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(i.services.clone()),
        })
    }

    async fn dashboard_info(&self) -> Result<DashboardInfo> {
        self.record("dashboard".to_string());
        Ok(self.with(|i| i.dashboard.clone()))
    }

    async fn start(&self, exec_id: &ExecId) -> Result<()> {
        self.command("start", exec_id)
    }

    async fn stop(&self, exec_id: &ExecId) -> Result<()> {
        self.command("stop", exec_id)
    }

    async fn restart(&self, exec_id: &ExecId) -> Result<()> {
        self.command("restart", exec_id)
    }

    async fn upload(&self, exec_id: &ExecId, binary: Vec<u8>) -> Result<()> {
        self.command("upload", exec_id)?;
        self.with(|i| i.uploads.push((exec_id.clone(), binary)));
        Ok(())
    }

    async fn list_log_files(&self, exec_id: &ExecId) -> Result<Vec<LogFile>> {
        self.record(format!("logs {exec_id}"));
        self.with(|i| match &i.command_failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(i.log_files.clone()),
        })
    }

    async fn download_log_file(&self, exec_id: &ExecId, name: &str) -> Result<Vec<u8>> {
        self.record(format!("download {exec_id} {name}"));
        self.with(|i| i.log_contents.get(name).cloned())
            .ok_or_else(|| Error::backend("log file not found"))
    }

    async fn fetch_config_file(&self, exec_id: &ExecId) -> Result<String> {
        self.record(format!("config {exec_id}"));
        Ok(self.with(|i| i.config_text.clone()))
    }

    async fn save_config_file(&self, exec_id: &ExecId, content: String) -> Result<()> {
        self.command("save-config", exec_id)?;
        self.with(|i| i.saved_configs.push((exec_id.clone(), content)));
        Ok(())
    }

    fn log_file_url(&self, exec_id: &ExecId, name: &str) -> String {
        format!("http://fake/api/service/{exec_id}/log/{name}")
    }

    fn output_url(&self, exec_id: &ExecId) -> String {
        let base = self.with(|i| i.output_base.clone());
        format!("{base}/api/service/{exec_id}/output")
    }
}
