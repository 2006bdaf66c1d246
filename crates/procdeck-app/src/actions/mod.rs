//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Every backend call runs in its own tokio task and reports back through the
//! message channel. Nothing here touches `AppState`.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use procdeck_client::Backend;

use crate::handler::UpdateAction;
use crate::message::Message;

pub(super) mod commands;
pub(super) mod network;
pub(super) mod stream;

pub use network::open_url_in_browser;

/// Execute an action by spawning a background task
///
/// `UpdateAction::Publish` is handled synchronously by the message loop and
/// never reaches this function.
pub fn handle_action<B>(action: UpdateAction, backend: &Arc<B>, msg_tx: mpsc::Sender<Message>)
where
    B: Backend + Sync + 'static,
{
    match action {
        UpdateAction::FetchRegistry { seq } => {
            commands::spawn_registry_fetch(Arc::clone(backend), seq, msg_tx);
        }

        UpdateAction::FetchDashboardInfo => {
            commands::spawn_dashboard_info(Arc::clone(backend), msg_tx);
        }

        UpdateAction::RunCommand { exec_id, kind } => {
            commands::spawn_command(Arc::clone(backend), exec_id, kind, msg_tx);
        }

        UpdateAction::Upload { exec_id, path } => {
            commands::spawn_upload(Arc::clone(backend), exec_id, path, msg_tx);
        }

        UpdateAction::FetchConfigFile { exec_id, fetch_id } => {
            commands::spawn_config_fetch(Arc::clone(backend), exec_id, fetch_id, msg_tx);
        }

        UpdateAction::SaveConfigFile { exec_id, content } => {
            commands::spawn_config_save(Arc::clone(backend), exec_id, content, msg_tx);
        }

        UpdateAction::FetchLogFiles { exec_id } => {
            commands::spawn_log_files_fetch(Arc::clone(backend), exec_id, msg_tx);
        }

        UpdateAction::OpenLogFile {
            exec_id,
            name,
            browser,
        } => {
            let url = backend.log_file_url(&exec_id, &name);
            network::spawn_open_browser(url, browser);
        }

        UpdateAction::DownloadLogFile { exec_id, name, dir } => {
            network::spawn_log_download(Arc::clone(backend), exec_id, name, dir, msg_tx);
        }

        UpdateAction::OpenOutputStream {
            session_id,
            exec_id,
            link,
            previous,
        } => {
            let url = backend.output_url(&exec_id);
            stream::spawn_output_stream(session_id, url, link, previous, msg_tx);
        }

        UpdateAction::Publish(event) => {
            warn!("Publish action reached the task dispatcher: {:?}", event);
        }
    }
}
