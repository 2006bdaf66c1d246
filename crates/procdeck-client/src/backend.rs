//! The supervisor backend contract.
//!
//! The app layer only talks to the backend through [`Backend`], so the engine
//! and dispatcher can be driven by an in-memory fake in tests.

use procdeck_core::prelude::*;
use procdeck_core::{DashboardInfo, ExecId, LogFile, ServiceSnapshot};

/// Operations the supervisor backend exposes
#[trait_variant::make(Backend: Send)]
pub trait LocalBackend {
    /// Fetch the full service registry (`GET /api/service`)
    async fn list_services(&self) -> Result<Vec<ServiceSnapshot>>;

    /// Fetch dashboard title and meta-variables (`GET /api/config`)
    async fn dashboard_info(&self) -> Result<DashboardInfo>;

    async fn start(&self, exec_id: &ExecId) -> Result<()>;

    async fn stop(&self, exec_id: &ExecId) -> Result<()>;

    async fn restart(&self, exec_id: &ExecId) -> Result<()>;

    /// Replace the service binary. The payload is sent as multipart part
    /// `file` with file name `binary`.
    async fn upload(&self, exec_id: &ExecId, binary: Vec<u8>) -> Result<()>;

    async fn list_log_files(&self, exec_id: &ExecId) -> Result<Vec<LogFile>>;

    /// Raw contents of one log file
    async fn download_log_file(&self, exec_id: &ExecId, name: &str) -> Result<Vec<u8>>;

    /// Raw text of the service's config file
    async fn fetch_config_file(&self, exec_id: &ExecId) -> Result<String>;

    async fn save_config_file(&self, exec_id: &ExecId, content: String) -> Result<()>;

    /// URL of a log file, for opening outside the app
    fn log_file_url(&self, exec_id: &ExecId, name: &str) -> String;

    /// WebSocket URL streaming the service's live stdout
    fn output_url(&self, exec_id: &ExecId) -> String;
}
