//! Settings loader for `config.toml`

use std::path::{Path, PathBuf};

use super::types::Settings;
use procdeck_core::prelude::*;

const CONFIG_DIR: &str = "procdeck";
const CONFIG_FILENAME: &str = "config.toml";

/// `<config_dir>/procdeck/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

/// Load settings from `config_path`.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match parse_settings(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Parse the contents of a `config.toml`.
pub fn parse_settings(content: &str) -> Result<Settings> {
    toml::from_str(content).map_err(|e| Error::config(e.to_string()))
}

const DEFAULT_CONFIG: &str = r#"# procdeck configuration

[server]
address = "127.0.0.1:7798"   # host:port or full URL, used in prod mode
scheme = "http"              # https also switches output streams to wss
# mode = "prod"              # dev = localhost:8080; defaults to dev in debug builds
poll_interval_ms = 2000      # registry refresh cadence (min 250)
request_timeout_ms = 5000

[terminal]
scrollback_lines = 5000

[ui]
toast_duration_ms = 3000
browser = ""                 # Empty = system default

[downloads]
# dir = "/path/to/downloads" # defaults to the system download directory
"#;

/// Write a commented default config to `config_path`.
///
/// Returns `false` without touching anything if the file already exists.
pub fn init_config_file(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(dir) = config_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    std::fs::write(config_path, DEFAULT_CONFIG).context("Failed to write config.toml")?;

    info!("Wrote default config to {:?}", config_path);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use procdeck_client::Mode;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = tempdir().unwrap();
        let settings = load_settings(&temp.path().join("nope.toml"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[server\naddress = ").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_load_custom_values() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
address = "svc.internal:7000"
scheme = "https"
mode = "prod"
poll_interval_ms = 500

[terminal]
scrollback_lines = 100

[ui]
browser = "firefox"

[downloads]
dir = "/tmp/logs"
"#,
        )
        .unwrap();

        let s = load_settings(&path);
        assert_eq!(s.server.address, "svc.internal:7000");
        assert_eq!(s.server.scheme, "https");
        assert_eq!(s.server.mode, Mode::Prod);
        assert_eq!(s.server.poll_interval_ms, 500);
        assert_eq!(s.terminal.scrollback_lines, 100);
        assert_eq!(s.ui.browser, "firefox");
        assert_eq!(s.ui.toast_duration_ms, 3000);
        assert_eq!(s.downloads.dir, PathBuf::from("/tmp/logs"));
    }

    #[test]
    fn test_init_config_file_round_trips_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        assert!(init_config_file(&path).unwrap());
        assert!(path.exists());
        assert!(!init_config_file(&path).unwrap());

        let s = load_settings(&path);
        assert_eq!(s.server, super::super::types::ServerSettings::default());
        assert_eq!(s.terminal.scrollback_lines, 5000);
    }

    #[test]
    fn test_parse_settings_rejects_bad_toml() {
        let err = parse_settings("[server\naddress = 1").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(parse_settings("").is_ok());
    }

    #[test]
    fn test_init_config_file_reports_io_error() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let err = init_config_file(&blocker.join("config.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_init_config_file_keeps_existing() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[ui]\nbrowser = \"x\"\n").unwrap();
        assert!(!init_config_file(&path).unwrap());
        assert_eq!(load_settings(&path).ui.browser, "x");
    }
}
