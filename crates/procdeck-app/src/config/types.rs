//! Configuration types for procdeck
//!
//! Every section and field has a default, so a partial (or empty) file is
//! always valid.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use procdeck_client::{Endpoint, Mode};
use procdeck_core::prelude::*;

use crate::poller::{DEFAULT_POLL_INTERVAL_MS, MIN_POLL_INTERVAL_MS};
use crate::terminal::DEFAULT_SCROLLBACK_LINES;

/// Global application settings from `config.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub terminal: TerminalSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub downloads: DownloadSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerSettings {
    /// Backend address used in prod mode (`host:port` or a full URL)
    #[serde(default = "default_address")]
    pub address: String,

    /// `http` or `https`; `https` also switches streams to `wss`
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// `dev` talks to the fixed development host
    #[serde(default)]
    pub mode: Mode,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: default_address(),
            scheme: default_scheme(),
            mode: Mode::default(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ServerSettings {
    pub fn endpoint(&self) -> Result<Endpoint> {
        Endpoint::resolve(self.mode, &self.scheme, &self.address)
    }

    /// Poll interval after clamping to the minimum.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }
}

fn default_address() -> String {
    "127.0.0.1:7798".to_string()
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_request_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TerminalSettings {
    /// Lines kept per terminal session; older lines are evicted
    #[serde(default = "default_scrollback_lines")]
    pub scrollback_lines: usize,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            scrollback_lines: default_scrollback_lines(),
        }
    }
}

fn default_scrollback_lines() -> usize {
    DEFAULT_SCROLLBACK_LINES
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UiSettings {
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,

    /// Command used to open log files; empty uses the platform default
    #[serde(default)]
    pub browser: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            toast_duration_ms: default_toast_duration_ms(),
            browser: String::new(),
        }
    }
}

impl UiSettings {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

fn default_toast_duration_ms() -> u64 {
    3000
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DownloadSettings {
    /// Where downloaded log files are written
    #[serde(default = "default_download_dir")]
    pub dir: PathBuf,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            dir: default_download_dir(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.server.address, "127.0.0.1:7798");
        assert_eq!(s.server.scheme, "http");
        assert_eq!(s.server.poll_interval_ms, 2000);
        assert_eq!(s.server.request_timeout_ms, 5000);
        assert_eq!(s.terminal.scrollback_lines, 5000);
        assert_eq!(s.ui.toast_duration_ms, 3000);
        assert!(s.ui.browser.is_empty());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let s: Settings = toml::from_str(
            r#"
[server]
address = "10.0.0.5:9000"
mode = "prod"
"#,
        )
        .unwrap();
        assert_eq!(s.server.address, "10.0.0.5:9000");
        assert_eq!(s.server.mode, Mode::Prod);
        assert_eq!(s.server.scheme, "http");
        assert_eq!(s.terminal, TerminalSettings::default());
    }

    #[test]
    fn test_poll_interval_clamped() {
        let server = ServerSettings {
            poll_interval_ms: 10,
            ..Default::default()
        };
        assert_eq!(server.poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_endpoint_in_prod_uses_address() {
        let server = ServerSettings {
            mode: Mode::Prod,
            address: "10.0.0.5:9000".into(),
            ..Default::default()
        };
        assert_eq!(server.endpoint().unwrap().authority(), "10.0.0.5:9000");
    }

    #[test]
    fn test_endpoint_in_dev_uses_dev_host() {
        let server = ServerSettings {
            mode: Mode::Dev,
            ..Default::default()
        };
        assert_eq!(
            server.endpoint().unwrap().authority(),
            procdeck_client::DEV_HOST
        );
    }
}
