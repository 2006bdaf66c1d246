//! Log files outside the app: browser hand-off and downloads.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use procdeck_client::Backend;
use procdeck_core::ExecId;

use crate::message::Message;

/// Open `url` in a new browser context without blocking the event loop.
pub(super) fn spawn_open_browser(url: String, browser: String) {
    tokio::task::spawn_blocking(move || {
        if let Err(e) = open_url_in_browser(&url, &browser) {
            warn!("Failed to open {} in browser: {}", url, e);
        }
    });
}

pub(super) fn spawn_log_download<B>(
    backend: Arc<B>,
    exec_id: ExecId,
    name: String,
    dir: PathBuf,
    msg_tx: mpsc::Sender<Message>,
) where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match download_to(&*backend, &exec_id, &name, &dir).await {
            Ok(path) => {
                info!("Downloaded {} to {}", name, path.display());
                Message::LogFileDownloaded {
                    name,
                    path: path.display().to_string(),
                }
            }
            Err(error) => Message::LogFileDownloadFailed { name, error },
        };
        let _ = msg_tx.send(msg).await;
    });
}

async fn download_to<B: Backend>(
    backend: &B,
    exec_id: &ExecId,
    name: &str,
    dir: &Path,
) -> Result<PathBuf, String> {
    let bytes = backend
        .download_log_file(exec_id, name)
        .await
        .map_err(|e| e.user_message())?;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| format!("cannot create {}: {}", dir.display(), e))?;

    let path = dir.join(local_file_name(name));
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
    Ok(path)
}

/// Backend file names are plain names; strip anything path-like anyway.
fn local_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim_start_matches('.');
    if base.is_empty() {
        "log".to_string()
    } else {
        base.to_string()
    }
}

/// Open a URL in the configured browser, or the platform default if empty.
pub fn open_url_in_browser(url: &str, browser: &str) -> std::io::Result<()> {
    if !browser.is_empty() {
        Command::new(browser).arg(url).spawn()?;
        return Ok(());
    }

    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(url).spawn()?;
        return Ok(());
    }

    #[cfg(target_os = "linux")]
    {
        Command::new("xdg-open").arg(url).spawn()?;
        return Ok(());
    }

    #[cfg(target_os = "windows")]
    {
        Command::new("cmd").args(["/C", "start", "", url]).spawn()?;
        return Ok(());
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "no browser opener available for this platform",
        ));
    }

    #[allow(unreachable_code)]
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeBackend;

    #[test]
    fn test_local_file_name() {
        assert_eq!(local_file_name("app.log"), "app.log");
        assert_eq!(local_file_name("../../etc/passwd"), "passwd");
        assert_eq!(local_file_name("..\\x.log"), "x.log");
        assert_eq!(local_file_name(".."), "log");
    }

    #[tokio::test]
    async fn test_download_writes_into_dir() {
        let temp = tempfile::tempdir().unwrap();
        let backend = FakeBackend::new();
        backend.set_log_content("app.log", b"line 1\nline 2\n");

        let path = download_to(
            &backend,
            &ExecId::from("svc1"),
            "app.log",
            &temp.path().join("logs"),
        )
        .await
        .unwrap();

        assert_eq!(path, temp.path().join("logs").join("app.log"));
        assert_eq!(std::fs::read(&path).unwrap(), b"line 1\nline 2\n");
    }

    #[tokio::test]
    async fn test_download_backend_error_is_verbatim() {
        let temp = tempfile::tempdir().unwrap();
        let backend = FakeBackend::new();
        let err = download_to(&backend, &ExecId::from("svc1"), "missing.log", temp.path())
            .await
            .unwrap_err();
        assert_eq!(err, "log file not found");
    }
}
