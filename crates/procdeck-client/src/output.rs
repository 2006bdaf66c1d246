//! WebSocket client for a service's live stdout.
//!
//! The backend pushes text frames on `/api/service/{exec}/output` and never
//! reads anything from the client. [`OutputStream`] wraps one such socket;
//! lifecycle (replacement, shutdown, reporting) lives in the app layer.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use procdeck_core::prelude::*;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Upper bound on writing the Close frame to a peer that stopped reading.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// One item read from the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputItem {
    /// A text frame, exactly as received
    Frame(String),
    /// The socket is gone. `reason` is `None` for a clean close.
    Closed { reason: Option<String> },
}

/// An open output socket.
pub struct OutputStream {
    url: String,
    ws: WsStream,
}

impl std::fmt::Debug for OutputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputStream").field("url", &self.url).finish()
    }
}

impl OutputStream {
    /// Open the socket at `url` (`ws://` or `wss://`).
    pub async fn connect(url: &str) -> Result<Self> {
        debug!("Output stream: connecting to {}", url);
        let (ws, _response) = connect_async(url)
            .await
            .map_err(|err| Error::stream(format!("failed to connect to {url}: {err}")))?;
        Ok(Self {
            url: url.to_string(),
            ws,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Wait for the next text frame.
    ///
    /// Ping/pong and binary frames are skipped. Once this returns
    /// [`OutputItem::Closed`] the stream must not be polled again.
    pub async fn next_item(&mut self) -> OutputItem {
        loop {
            match self.ws.next().await {
                Some(Ok(WsMessage::Text(text))) => {
                    return OutputItem::Frame(text.as_str().to_string())
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!("Output stream: received Close frame from {}", self.url);
                    let reason = frame
                        .map(|f| f.reason.as_str().to_string())
                        .filter(|r| !r.is_empty());
                    return OutputItem::Closed { reason };
                }
                Some(Ok(_)) => {
                    // Ping/Pong/Binary
                }
                Some(Err(err)) => {
                    warn!("Output stream: read error on {}: {}", self.url, err);
                    return OutputItem::Closed {
                        reason: Some(err.to_string()),
                    };
                }
                None => {
                    return OutputItem::Closed {
                        reason: Some("connection closed".to_string()),
                    }
                }
            }
        }
    }

    /// Send a Close frame and drop the socket.
    ///
    /// The backend never reads from this socket, so no Close reply is
    /// awaited. Write errors are ignored.
    pub async fn close(mut self) {
        if tokio::time::timeout(CLOSE_TIMEOUT, self.ws.close(None))
            .await
            .is_err()
        {
            debug!("Output stream: close timed out for {}", self.url);
        }
        debug!("Output stream: closed {}", self.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockWsServer;

    #[tokio::test]
    async fn test_receives_frames_in_order() {
        let mut server = MockWsServer::start().await;
        let url = format!("ws://{}/api/service/svc1/output", server.address());

        let client = tokio::spawn(async move {
            let mut stream = OutputStream::connect(&url).await.unwrap();
            let mut items = Vec::new();
            loop {
                let item = stream.next_item().await;
                let done = matches!(item, OutputItem::Closed { .. });
                items.push(item);
                if done {
                    break;
                }
            }
            items
        });

        let conn = server.accept().await;
        assert_eq!(conn.path, "/api/service/svc1/output");
        conn.frames.send(Some("a\n".into())).unwrap();
        conn.frames.send(Some("b\n".into())).unwrap();
        conn.frames.send(None).unwrap();

        let items = client.await.unwrap();
        assert_eq!(items[0], OutputItem::Frame("a\n".into()));
        assert_eq!(items[1], OutputItem::Frame("b\n".into()));
        assert!(matches!(items[2], OutputItem::Closed { .. }));
    }

    #[tokio::test]
    async fn test_close_reaches_server() {
        let mut server = MockWsServer::start().await;
        let url = format!("ws://{}/api/service/svc1/output", server.address());

        let stream = OutputStream::connect(&url).await.unwrap();
        let conn = server.accept().await;

        stream.close().await;
        tokio::time::timeout(std::time::Duration::from_secs(5), conn.closed)
            .await
            .expect("server saw close")
            .unwrap();
    }

    #[tokio::test]
    async fn test_close_returns_when_server_never_reads() {
        let mut server = MockWsServer::start_write_only().await;
        let url = format!("ws://{}/api/service/svc1/output", server.address());

        let stream = OutputStream::connect(&url).await.unwrap();
        let _conn = server.accept().await;

        tokio::time::timeout(std::time::Duration::from_secs(5), stream.close())
            .await
            .expect("close does not wait for a reply");
    }

    #[tokio::test]
    async fn test_connect_failure_is_stream_error() {
        let err = OutputStream::connect("ws://127.0.0.1:1/api/service/x/output")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Stream { .. }));
    }
}
