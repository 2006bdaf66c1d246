//! OS signal handling for graceful shutdown

use tokio::sync::mpsc;

use crate::message::Message;
use procdeck_core::prelude::*;

/// Spawn a task that listens for OS signals and sends quit messages
pub fn spawn_signal_handler(tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        if let Err(e) = wait_for_signal().await {
            error!("Signal handler error: {}", e);
            return;
        }

        info!("Shutdown signal received");
        let _ = tx.send(Message::Quit).await;
    });
}

/// Wait for SIGINT or SIGTERM (Ctrl+C on Windows)
async fn wait_for_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::SignalKind;

        let mut sigint = install(SignalKind::interrupt(), "SIGINT")?;
        let mut sigterm = install(SignalKind::terminate(), "SIGTERM")?;

        tokio::select! {
            _ = sigint.recv() => info!("Received SIGINT"),
            _ = sigterm.recv() => info!("Received SIGTERM"),
        }

        Ok(())
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")?;
        info!("Received Ctrl+C");
        Ok(())
    }
}

#[cfg(unix)]
fn install(kind: tokio::signal::unix::SignalKind, name: &str) -> Result<tokio::signal::unix::Signal> {
    tokio::signal::unix::signal(kind).with_context(|| format!("Failed to install {} handler", name))
}
