//! Terminal session: one service's live stdout bound to the terminal pane.
//!
//! ```text
//! Idle --select(id)--> Connecting --opened--> Streaming
//!   Connecting/Streaming --select(id')--> Connecting (previous socket closed first)
//!   Connecting/Streaming --select("") or unmount--> Closed
//! ```
//!
//! At most one session exists. Every select allocates a new session id, so
//! frames from a replaced socket can be recognised and dropped. The socket
//! itself lives in a background task (see `actions::stream`); this module
//! only holds the scrollback and the handle used to tell the task to close.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use procdeck_core::ExecId;

/// Monotonic session generation.
pub type SessionId = u64;

/// Default scrollback cap.
pub const DEFAULT_SCROLLBACK_LINES: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalStatus {
    Idle,
    Connecting,
    Streaming,
    Closed,
}

// ─────────────────────────────────────────────────────────────────
// Socket lifecycle handles
// ─────────────────────────────────────────────────────────────────

/// App-side handle on a stream task.
#[derive(Debug, Clone)]
pub struct StreamHandle {
    pub session_id: SessionId,
    // Arc because Message/UpdateAction derive Clone and watch::Sender does not.
    shutdown: Arc<watch::Sender<bool>>,
    closed: watch::Receiver<bool>,
}

/// Task-side end of a [`StreamHandle`].
#[derive(Debug, Clone)]
pub struct StreamLink {
    pub shutdown_rx: watch::Receiver<bool>,
    closed_tx: Arc<watch::Sender<bool>>,
}

/// Create a connected handle/link pair for a new session.
pub fn stream_pair(session_id: SessionId) -> (StreamHandle, StreamLink) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (closed_tx, closed_rx) = watch::channel(false);
    (
        StreamHandle {
            session_id,
            shutdown: Arc::new(shutdown_tx),
            closed: closed_rx,
        },
        StreamLink {
            shutdown_rx,
            closed_tx: Arc::new(closed_tx),
        },
    )
}

impl StreamHandle {
    /// Ask the task to close its socket. Idempotent.
    pub fn close(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_close_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// True once the task has released its socket.
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Wait until the task has released its socket (or is gone).
    pub async fn wait_closed(&self) {
        let mut closed = self.closed.clone();
        let _ = closed.wait_for(|c| *c).await;
    }
}

impl StreamLink {
    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Report that the socket is fully released.
    pub fn mark_closed(&self) {
        self.closed_tx.send_replace(true);
    }
}

// ─────────────────────────────────────────────────────────────────
// Session state
// ─────────────────────────────────────────────────────────────────

/// Split a text frame into scrollback lines.
///
/// Trailing whitespace is trimmed, then the frame is split on `\n` with a
/// trailing `\r` dropped from each line.
pub fn split_frame(frame: &str) -> Vec<String> {
    frame
        .trim_end()
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

#[derive(Debug)]
pub struct TerminalSession {
    status: TerminalStatus,
    exec_id: ExecId,
    session_id: SessionId,
    handle: Option<StreamHandle>,
    lines: VecDeque<String>,
    max_lines: usize,
    /// Why the socket went away, if it did on its own.
    disconnected: Option<String>,
    /// Lines scrolled up from the tail; 0 follows new output.
    scroll_offset: usize,
    viewport: Option<(u16, u16)>,
}

impl Default for TerminalSession {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLLBACK_LINES)
    }
}

impl TerminalSession {
    pub fn new(max_lines: usize) -> Self {
        Self {
            status: TerminalStatus::Idle,
            exec_id: ExecId::default(),
            session_id: 0,
            handle: None,
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
            disconnected: None,
            scroll_offset: 0,
            viewport: None,
        }
    }

    /// Bind the terminal to `exec_id`, replacing any current session.
    ///
    /// Returns the previous stream handle (already told to close) and, unless
    /// `exec_id` is empty, the link for the new stream task.
    pub fn select(&mut self, exec_id: ExecId) -> (Option<StreamHandle>, Option<StreamLink>) {
        let previous = self.release();

        if exec_id.is_empty() {
            if self.status != TerminalStatus::Idle {
                self.status = TerminalStatus::Closed;
            }
            self.exec_id = ExecId::default();
            return (previous, None);
        }

        self.session_id += 1;
        let (handle, link) = stream_pair(self.session_id);
        debug!(
            "terminal: session {} bound to {}",
            self.session_id, exec_id
        );
        self.lines.push_back(format!("connected to {}", exec_id));
        self.exec_id = exec_id;
        self.handle = Some(handle);
        self.status = TerminalStatus::Connecting;
        (previous, Some(link))
    }

    /// Tear the session down (app exit). Returns the handle to wait on.
    pub fn close(&mut self) -> Option<StreamHandle> {
        let previous = self.release();
        if self.status != TerminalStatus::Idle {
            self.status = TerminalStatus::Closed;
        }
        self.exec_id = ExecId::default();
        previous
    }

    /// Signal the current socket to close and dispose of the buffer.
    fn release(&mut self) -> Option<StreamHandle> {
        let previous = self.handle.take();
        if let Some(handle) = &previous {
            handle.close();
        }
        self.lines.clear();
        self.disconnected = None;
        self.scroll_offset = 0;
        previous
    }

    pub fn on_connected(&mut self, session_id: SessionId) -> bool {
        if !self.is_current(session_id) {
            return false;
        }
        if self.status == TerminalStatus::Connecting {
            self.status = TerminalStatus::Streaming;
        }
        true
    }

    /// Append a frame. Frames from a replaced session are ignored.
    pub fn on_frame(&mut self, session_id: SessionId, frame: &str) -> bool {
        if !self.is_current(session_id) {
            return false;
        }
        for line in split_frame(frame) {
            self.push_line(line);
        }
        true
    }

    /// Record that the socket went away on its own.
    pub fn on_closed(&mut self, session_id: SessionId, reason: Option<String>) -> bool {
        if !self.is_current(session_id) {
            return false;
        }
        let reason = reason.unwrap_or_else(|| "connection closed".to_string());
        debug!("terminal: session {} disconnected: {}", session_id, reason);
        self.disconnected = Some(reason);
        true
    }

    /// Wipe the scrollback. The socket is untouched.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll_offset = 0;
    }

    /// Re-fit to a new viewport. Ignored without an active session.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        if !self.is_active() {
            return false;
        }
        self.viewport = Some((width, height));
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
        true
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = (self.scroll_offset + amount).min(self.max_scroll());
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    /// Rows per page for scrolling.
    pub fn page_size(&self) -> usize {
        self.viewport
            .map(|(_, h)| usize::from(h).max(1))
            .unwrap_or(10)
    }

    fn max_scroll(&self) -> usize {
        let visible = self.viewport.map(|(_, h)| usize::from(h)).unwrap_or(0);
        self.lines.len().saturating_sub(visible)
    }

    fn push_line(&mut self, line: String) {
        if self.lines.len() == self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
        // Keep the view anchored while scrolled back
        if self.scroll_offset > 0 {
            self.scroll_offset = (self.scroll_offset + 1).min(self.max_scroll());
        }
    }

    fn is_current(&self, session_id: SessionId) -> bool {
        self.is_active() && session_id == self.session_id
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            TerminalStatus::Connecting | TerminalStatus::Streaming
        )
    }

    pub fn status(&self) -> TerminalStatus {
        self.status
    }

    pub fn exec_id(&self) -> &ExecId {
        &self.exec_id
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn handle(&self) -> Option<&StreamHandle> {
        self.handle.as_ref()
    }

    pub fn lines(&self) -> &VecDeque<String> {
        &self.lines
    }

    pub fn disconnected(&self) -> Option<&str> {
        self.disconnected.as_deref()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn viewport(&self) -> Option<(u16, u16)> {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(t: &TerminalSession) -> Vec<&str> {
        t.lines().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_split_frame() {
        assert_eq!(split_frame("a\n"), vec!["a"]);
        assert_eq!(split_frame("a\r\nb\r\n"), vec!["a", "b"]);
        assert_eq!(split_frame("one\n\ntwo  \n"), vec!["one", "", "two"]);
        assert_eq!(split_frame("c"), vec!["c"]);
    }

    #[test]
    fn test_select_from_idle() {
        let mut t = TerminalSession::default();
        let (prev, link) = t.select(ExecId::from("svc1"));
        assert!(prev.is_none());
        assert!(link.is_some());
        assert_eq!(t.status(), TerminalStatus::Connecting);
        assert_eq!(lines(&t), vec!["connected to svc1"]);
    }

    #[test]
    fn test_replace_closes_previous_and_drops_stale_frames() {
        let mut t = TerminalSession::default();
        t.select(ExecId::from("svc1"));
        let first = t.session_id();
        t.on_connected(first);
        t.on_frame(first, "a\n");
        t.on_frame(first, "b\n");
        t.on_frame(first, "c");
        assert_eq!(lines(&t), vec!["connected to svc1", "a", "b", "c"]);

        let (prev, _) = t.select(ExecId::from("svc2"));
        let prev = prev.expect("previous handle");
        assert!(prev.is_close_requested());
        assert_eq!(lines(&t), vec!["connected to svc2"]);

        // Late svc1 frame
        assert!(!t.on_frame(first, "late\n"));
        assert_eq!(lines(&t), vec!["connected to svc2"]);
    }

    #[test]
    fn test_reselecting_same_service_replaces_session() {
        let mut t = TerminalSession::default();
        t.select(ExecId::from("svc1"));
        let first = t.session_id();
        t.on_frame(first, "old\n");

        let (prev, link) = t.select(ExecId::from("svc1"));
        assert!(prev.is_some());
        assert!(link.is_some());
        assert_ne!(t.session_id(), first);
        assert_eq!(lines(&t), vec!["connected to svc1"]);
    }

    #[test]
    fn test_select_empty_closes() {
        let mut t = TerminalSession::default();
        t.select(ExecId::from("svc1"));
        let (prev, link) = t.select(ExecId::default());
        assert!(prev.is_some());
        assert!(link.is_none());
        assert_eq!(t.status(), TerminalStatus::Closed);
        assert!(t.lines().is_empty());
    }

    #[test]
    fn test_select_empty_while_idle_stays_idle() {
        let mut t = TerminalSession::default();
        let (prev, link) = t.select(ExecId::default());
        assert!(prev.is_none() && link.is_none());
        assert_eq!(t.status(), TerminalStatus::Idle);
    }

    #[test]
    fn test_clear_keeps_session() {
        let mut t = TerminalSession::default();
        t.select(ExecId::from("svc1"));
        let id = t.session_id();
        t.on_connected(id);
        t.clear();
        assert!(t.lines().is_empty());
        assert_eq!(t.status(), TerminalStatus::Streaming);
        assert!(!t.handle().unwrap().is_close_requested());
        assert!(t.on_frame(id, "after\n"));
    }

    #[test]
    fn test_disconnect_recorded_without_state_change() {
        let mut t = TerminalSession::default();
        t.select(ExecId::from("svc1"));
        let id = t.session_id();
        t.on_connected(id);
        t.on_closed(id, Some("reset by peer".into()));
        assert_eq!(t.status(), TerminalStatus::Streaming);
        assert_eq!(t.disconnected(), Some("reset by peer"));

        t.on_closed(id, None);
        assert_eq!(t.disconnected(), Some("connection closed"));
    }

    #[test]
    fn test_scrollback_cap() {
        let mut t = TerminalSession::new(3);
        t.select(ExecId::from("svc1"));
        let id = t.session_id();
        t.on_frame(id, "1\n2\n3\n4");
        assert_eq!(lines(&t), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_resize_only_when_active() {
        let mut t = TerminalSession::default();
        assert!(!t.resize(80, 24));
        assert!(t.viewport().is_none());

        t.select(ExecId::from("svc1"));
        assert!(t.resize(80, 24));
        assert_eq!(t.viewport(), Some((80, 24)));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut t = TerminalSession::default();
        t.select(ExecId::from("svc1"));
        t.resize(80, 2);
        let id = t.session_id();
        t.on_frame(id, "a\nb\nc\nd");
        // 5 lines, 2 visible
        t.scroll_up(100);
        assert_eq!(t.scroll_offset(), 3);
        t.scroll_down(1);
        assert_eq!(t.scroll_offset(), 2);
        t.scroll_down(10);
        assert_eq!(t.scroll_offset(), 0);
    }

    #[tokio::test]
    async fn test_wait_closed_resolves_after_mark() {
        let (handle, link) = stream_pair(1);
        assert!(!handle.is_closed());
        handle.close();
        assert!(link.is_shutdown());

        let waiter = tokio::spawn({
            let handle = handle.clone();
            async move { handle.wait_closed().await }
        });
        link.mark_closed();
        waiter.await.unwrap();
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_wait_closed_resolves_when_task_is_gone() {
        let (handle, link) = stream_pair(1);
        drop(link);
        handle.wait_closed().await;
    }
}
