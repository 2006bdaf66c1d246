//! Backend request tasks.
//!
//! Each spawn function issues one request and sends exactly one message with
//! the outcome. Send failures mean the engine is shutting down and are
//! ignored.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use procdeck_client::Backend;
use procdeck_core::ExecId;

use crate::dispatcher::{ActionKind, CommandOutcome};
use crate::message::Message;

pub(super) fn spawn_registry_fetch<B>(backend: Arc<B>, seq: u64, msg_tx: mpsc::Sender<Message>)
where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        let result = backend
            .list_services()
            .await
            .map_err(|e| e.to_string());
        let _ = msg_tx.send(Message::RegistryFetched { seq, result }).await;
    });
}

pub(super) fn spawn_dashboard_info<B>(backend: Arc<B>, msg_tx: mpsc::Sender<Message>)
where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match backend.dashboard_info().await {
            Ok(info) => Message::DashboardInfoLoaded(info),
            Err(e) => Message::DashboardInfoFailed(e.to_string()),
        };
        let _ = msg_tx.send(msg).await;
    });
}

pub(super) fn spawn_command<B>(
    backend: Arc<B>,
    exec_id: ExecId,
    kind: ActionKind,
    msg_tx: mpsc::Sender<Message>,
) where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        let result = match kind {
            ActionKind::Start => backend.start(&exec_id).await,
            ActionKind::Stop => backend.stop(&exec_id).await,
            ActionKind::Restart => backend.restart(&exec_id).await,
        };
        match &result {
            Err(e) if e.is_recoverable() => warn!("{} {} failed: {}", kind, exec_id, e),
            Err(e) => error!("{} {} failed: {}", kind, exec_id, e),
            Ok(()) => {}
        }
        let outcome = CommandOutcome::from_result(&result);
        let _ = msg_tx
            .send(Message::CommandSettled {
                exec_id,
                kind,
                outcome,
            })
            .await;
    });
}

pub(super) fn spawn_upload<B>(
    backend: Arc<B>,
    exec_id: ExecId,
    path: PathBuf,
    msg_tx: mpsc::Sender<Message>,
) where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        let outcome = match tokio::fs::read(&path).await {
            Ok(binary) => {
                debug!(
                    "Uploading {} ({} bytes) to {}",
                    path.display(),
                    binary.len(),
                    exec_id
                );
                CommandOutcome::from_result(&backend.upload(&exec_id, binary).await)
            }
            Err(e) => CommandOutcome::Failed(format!("cannot read {}: {}", path.display(), e)),
        };
        let _ = msg_tx
            .send(Message::UploadSettled { exec_id, outcome })
            .await;
    });
}

pub(super) fn spawn_config_fetch<B>(
    backend: Arc<B>,
    exec_id: ExecId,
    fetch_id: u64,
    msg_tx: mpsc::Sender<Message>,
) where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match backend.fetch_config_file(&exec_id).await {
            Ok(text) => Message::ConfigFileLoaded {
                exec_id,
                fetch_id,
                text,
            },
            Err(e) => Message::ConfigFileFailed {
                exec_id,
                fetch_id,
                error: e.user_message(),
            },
        };
        let _ = msg_tx.send(msg).await;
    });
}

pub(super) fn spawn_config_save<B>(
    backend: Arc<B>,
    exec_id: ExecId,
    content: String,
    msg_tx: mpsc::Sender<Message>,
) where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        let result = backend.save_config_file(&exec_id, content).await;
        let outcome = CommandOutcome::from_result(&result);
        let _ = msg_tx.send(Message::ConfigSaved { exec_id, outcome }).await;
    });
}

pub(super) fn spawn_log_files_fetch<B>(
    backend: Arc<B>,
    exec_id: ExecId,
    msg_tx: mpsc::Sender<Message>,
) where
    B: Backend + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match backend.list_log_files(&exec_id).await {
            Ok(files) => Message::LogFilesLoaded { exec_id, files },
            Err(e) => Message::LogFilesFailed {
                exec_id,
                error: e.user_message(),
            },
        };
        let _ = msg_tx.send(msg).await;
    });
}
