//! Output stream task for the terminal session.
//!
//! One task per session. It waits for the replaced session's socket to be
//! released, connects, then forwards text frames as
//! [`Message::TerminalFrame`] until the app asks it to close or the socket
//! goes away. It always reports itself closed on exit so the next session
//! can proceed.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use procdeck_client::{OutputItem, OutputStream};

use crate::message::Message;
use crate::terminal::{SessionId, StreamHandle, StreamLink};

/// Maximum time to wait for the WebSocket handshake.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub(super) fn spawn_output_stream(
    session_id: SessionId,
    url: String,
    link: StreamLink,
    previous: Option<StreamHandle>,
    msg_tx: mpsc::Sender<Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Some(previous) = previous {
            debug!(
                "Terminal session {}: waiting for session {} to close",
                session_id, previous.session_id
            );
            previous.wait_closed().await;
        }

        run_stream(session_id, &url, link.shutdown_rx.clone(), &msg_tx).await;
        link.mark_closed();
        debug!("Terminal session {}: socket released", session_id);
    })
}

async fn run_stream(
    session_id: SessionId,
    url: &str,
    mut shutdown_rx: tokio::sync::watch::Receiver<bool>,
    msg_tx: &mpsc::Sender<Message>,
) {
    if *shutdown_rx.borrow() {
        // Replaced before it ever connected
        return;
    }

    let connect = tokio::time::timeout(CONNECT_TIMEOUT, OutputStream::connect(url));
    let connected = tokio::select! {
        result = connect => result,
        _ = async { let _ = shutdown_rx.wait_for(|stop| *stop).await; } => return,
    };

    let mut stream = match connected {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            warn!("Terminal session {}: {}", session_id, e);
            let _ = msg_tx
                .send(Message::TerminalClosed {
                    session_id,
                    reason: Some(e.to_string()),
                })
                .await;
            return;
        }
        Err(_) => {
            warn!("Terminal session {}: connection timed out ({})", session_id, url);
            let _ = msg_tx
                .send(Message::TerminalClosed {
                    session_id,
                    reason: Some("connection timed out".to_string()),
                })
                .await;
            return;
        }
    };

    info!("Terminal session {}: streaming {}", session_id, url);
    if msg_tx
        .send(Message::TerminalConnected { session_id })
        .await
        .is_err()
    {
        stream.close().await;
        return;
    }

    loop {
        tokio::select! {
            item = stream.next_item() => match item {
                OutputItem::Frame(text) => {
                    if msg_tx
                        .send(Message::TerminalFrame { session_id, text })
                        .await
                        .is_err()
                    {
                        // Engine gone
                        break;
                    }
                }
                OutputItem::Closed { reason } => {
                    info!("Terminal session {}: socket closed by server", session_id);
                    let _ = msg_tx
                        .send(Message::TerminalClosed { session_id, reason })
                        .await;
                    return;
                }
            },
            _ = async { let _ = shutdown_rx.wait_for(|stop| *stop).await; } => {
                debug!("Terminal session {}: close requested", session_id);
                break;
            }
        }
    }

    stream.close().await;
}
