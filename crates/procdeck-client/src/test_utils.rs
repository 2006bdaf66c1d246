//! Test utilities for backend client types
//!
//! Provides service fixtures plus tiny in-process HTTP and WebSocket servers
//! so the client can be exercised against real sockets.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;

use procdeck_core::{ExecId, ServiceSnapshot};

/// Creates a test service with basic defaults.
pub fn test_service(exec_id: &str, name: &str) -> ServiceSnapshot {
    ServiceSnapshot::new(ExecId::from(exec_id), name)
}

/// Creates a running test service in a category.
pub fn test_service_running(exec_id: &str, name: &str, category: &str) -> ServiceSnapshot {
    let mut service = test_service(exec_id, name);
    service.running = true;
    service.category = category.to_string();
    service.pid = 1000;
    service
}

// ─────────────────────────────────────────────────────────────────
// HTTP
// ─────────────────────────────────────────────────────────────────

/// A request as seen by [`MockHttpServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Header value by lower-case name.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }
}

/// Canned HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl MockResponse {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn text(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/plain",
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.as_bytes().to_vec(),
        }
    }
}

/// One-response-per-connection HTTP server bound to an ephemeral port.
pub struct MockHttpServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpServer {
    /// Start serving; `handler` picks the response for each request.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock http server");
        let addr = listener.local_addr().expect("mock http addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(handler);

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = Arc::clone(&recorded);
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    let _ = serve_connection(stream, recorded, handler.as_ref()).await;
                });
            }
        });

        Self { addr, requests }
    }

    /// `host:port` to hand to `Endpoint::resolve`.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

async fn serve_connection<F>(
    mut stream: TcpStream,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
    handler: &F,
) -> std::io::Result<()>
where
    F: Fn(&RecordedRequest) -> MockResponse,
{
    let request = read_request(&mut stream).await?;
    let response = handler(&request);
    recorded.lock().expect("requests lock").push(request);

    let head = format!(
        "HTTP/1.1 {} MOCK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        response.content_type,
        response.body.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(&response.body).await?;
    stream.shutdown().await
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let mut body = buf[header_end..].to_vec();
    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok());
    let chunked = headers
        .iter()
        .any(|(k, v)| k == "transfer-encoding" && v.contains("chunked"));

    if let Some(len) = content_length {
        while body.len() < len {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }
    } else if chunked {
        while !body.ends_with(b"0\r\n\r\n") {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }
        body = dechunk(&body);
    }

    Ok(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn dechunk(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut rest = raw;
    while let Some(line_end) = find(rest, b"\r\n") {
        let size_line = String::from_utf8_lossy(&rest[..line_end]).to_string();
        let size = usize::from_str_radix(size_line.trim(), 16).unwrap_or(0);
        rest = &rest[line_end + 2..];
        if size == 0 || rest.len() < size {
            break;
        }
        out.extend_from_slice(&rest[..size]);
        rest = &rest[(size + 2).min(rest.len())..];
    }
    out
}

// ─────────────────────────────────────────────────────────────────
// WebSocket
// ─────────────────────────────────────────────────────────────────

/// A single accepted WebSocket connection on [`MockWsServer`].
pub struct MockWsConnection {
    /// Request path the client connected to.
    pub path: String,
    /// Send a text frame (`Some`) or close the socket (`None`).
    pub frames: mpsc::UnboundedSender<Option<String>>,
    /// Fires once the client side has gone away.
    pub closed: tokio::sync::oneshot::Receiver<()>,
}

/// WebSocket server that hands every accepted connection to the test.
pub struct MockWsServer {
    addr: SocketAddr,
    connections: mpsc::UnboundedReceiver<MockWsConnection>,
}

impl MockWsServer {
    pub async fn start() -> Self {
        Self::start_with(true).await
    }

    /// Server that only writes: it never reads from the client, so Close
    /// frames are never answered and `closed` never fires.
    pub async fn start_write_only() -> Self {
        Self::start_with(false).await
    }

    async fn start_with(read_client: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock ws server");
        let addr = listener.local_addr().expect("mock ws addr");
        let (conn_tx, connections) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let conn_tx = conn_tx.clone();
                tokio::spawn(serve_ws(stream, conn_tx, read_client));
            }
        });

        Self { addr, connections }
    }

    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Wait for the next client connection.
    pub async fn accept(&mut self) -> MockWsConnection {
        self.connections
            .recv()
            .await
            .expect("mock ws server stopped")
    }
}

async fn serve_ws(
    stream: TcpStream,
    conn_tx: mpsc::UnboundedSender<MockWsConnection>,
    read_client: bool,
) {
    use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

    let path = Arc::new(Mutex::new(String::new()));
    let path_slot = Arc::clone(&path);
    let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
        *path_slot.lock().expect("path lock") = req.uri().path().to_string();
        Ok(resp)
    };

    let Ok(ws) = tokio_tungstenite::accept_hdr_async(stream, callback).await else {
        return;
    };
    let (mut sink, mut source) = ws.split();
    let (frames_tx, mut frames_rx) = mpsc::unbounded_channel::<Option<String>>();
    let (closed_tx, closed_rx) = tokio::sync::oneshot::channel();

    let path = path.lock().expect("path lock").clone();
    let _ = conn_tx.send(MockWsConnection {
        path,
        frames: frames_tx,
        closed: closed_rx,
    });

    if !read_client {
        // Hold the read half without polling it
        let _source = source;
        while let Some(Some(text)) = frames_rx.recv().await {
            if sink.send(WsMessage::Text(text.into())).await.is_err() {
                break;
            }
        }
        drop(closed_tx);
        return;
    }

    let mut closed_tx = Some(closed_tx);
    loop {
        tokio::select! {
            frame = frames_rx.recv() => match frame {
                Some(Some(text)) => {
                    if sink.send(WsMessage::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Some(None) | None => {
                    let _ = sink.send(WsMessage::Close(None)).await;
                    break;
                }
            },
            incoming = source.next() => match incoming {
                Some(Ok(WsMessage::Close(_))) | Some(Err(_)) | None => {
                    if let Some(tx) = closed_tx.take() {
                        let _ = tx.send(());
                    }
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }
    if let Some(tx) = closed_tx.take() {
        let _ = tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_fixture() {
        let service = test_service_running("svc1", "one", "web");
        assert!(service.running);
        assert_eq!(service.category(), Some("web"));
        assert_eq!(service.pid(), Some(1000));
    }

    #[test]
    fn test_dechunk() {
        let raw = b"5\r\nhello\r\n6\r\n world\r\n0\r\n\r\n";
        assert_eq!(dechunk(raw), b"hello world");
    }
}
