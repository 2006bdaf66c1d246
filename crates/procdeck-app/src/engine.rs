//! Engine - shared orchestration state for TUI and headless runners
//!
//! The Engine owns the TEA state, the message channel, the event bus, the
//! registry poller and the shutdown signal. Frontends feed it messages and
//! read `state` to render.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use procdeck_client::Backend;

use crate::bus::{BusEvent, Channel, EventBus, SubscriptionId};
use crate::config::Settings;
use crate::message::Message;
use crate::poller::{self, PollerHandle};
use crate::process;
use crate::registry::Snapshot;
use crate::signals;
use crate::state::AppState;

/// Time allowed for the terminal socket to close on shutdown.
const STREAM_CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Orchestration engine for procdeck.
///
/// Encapsulates all shared state between TUI and headless runners:
/// - TEA state management
/// - Message channel
/// - Event bus (created once, lives as long as the engine)
/// - Registry poll timer
/// - Shutdown signaling
/// - Settings
pub struct Engine<B> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, poller, tasks).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    /// The frontend event loop drains messages from here.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Sender for the shutdown signal. Send `true` to initiate shutdown.
    pub shutdown_tx: watch::Sender<bool>,

    /// Receiver for the shutdown signal. Clone for background tasks.
    pub shutdown_rx: watch::Receiver<bool>,

    /// Loaded settings
    pub settings: Settings,

    backend: Arc<B>,

    bus: EventBus,

    /// Messages produced by bus subscribers during a publish
    bus_inbox: mpsc::UnboundedReceiver<Message>,

    poller: Option<PollerHandle>,
}

impl<B> Engine<B>
where
    B: Backend + Sync + 'static,
{
    /// Create a new Engine.
    ///
    /// Must be called inside a tokio runtime (spawns the signal handler).
    /// Polling does not begin until [`Engine::start`].
    pub fn new(backend: B, settings: Settings, server_label: impl Into<String>) -> Self {
        let mut state = AppState::with_settings(settings.clone());
        state.server_label = server_label.into();

        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        signals::spawn_signal_handler(msg_tx.clone());

        let (inbox_tx, bus_inbox) = mpsc::unbounded_channel();
        let mut bus = EventBus::new();
        wire_bus(&mut bus, inbox_tx);

        Self {
            state,
            msg_tx,
            msg_rx,
            shutdown_tx,
            shutdown_rx,
            settings,
            backend: Arc::new(backend),
            bus,
            bus_inbox,
            poller: None,
        }
    }

    /// Start the registry poller and load the dashboard info.
    pub fn start(&mut self) {
        if self.poller.is_some() {
            return;
        }
        let handle = poller::start(self.settings.server.poll_interval_ms, self.msg_tx.clone());
        info!(
            "Engine started (poll every {}ms)",
            handle.interval().as_millis()
        );
        self.poller = Some(handle);
        crate::actions::handle_action(
            crate::handler::UpdateAction::FetchDashboardInfo,
            &self.backend,
            self.msg_tx.clone(),
        );
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|p| p.is_running())
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Process a single message through the TEA update cycle.
    pub fn process_message(&mut self, msg: Message) {
        process::process_message(
            &mut self.state,
            msg,
            &self.backend,
            &self.msg_tx,
            &mut self.bus,
            &mut self.bus_inbox,
        );
    }

    /// Drain and process all pending messages from the channel.
    pub fn drain_pending_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
        }
    }

    /// Publish an event on the bus and process its effects.
    pub fn publish(&mut self, event: BusEvent) {
        self.process_message(Message::Publish(event));
    }

    /// Add a bus subscriber alongside the built-in UI surfaces.
    pub fn subscribe<F>(&mut self, channel: Channel, handler: F) -> SubscriptionId
    where
        F: FnMut(&BusEvent) + Send + 'static,
    {
        self.bus.subscribe(channel, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Receive every accepted registry snapshot.
    pub fn subscribe_registry(&self) -> watch::Receiver<Snapshot> {
        self.state.registry.subscribe()
    }

    /// Get a clone of the message sender.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit
    }

    /// Stop the poller, close the terminal socket and signal background
    /// tasks to stop.
    pub async fn shutdown(&mut self) {
        info!("Engine shutting down");

        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }

        if let Some(handle) = self.state.terminal.close() {
            if tokio::time::timeout(STREAM_CLOSE_TIMEOUT, handle.wait_closed())
                .await
                .is_err()
            {
                warn!("Terminal stream did not close within {:?}", STREAM_CLOSE_TIMEOUT);
            }
        }

        let _ = self.shutdown_tx.send(true);
        debug!("Engine shutdown complete");
    }
}

/// Connect each UI surface to its channel. Subscribers only forward the
/// event into the engine as a message; state changes stay in `update`.
fn wire_bus(bus: &mut EventBus, inbox: mpsc::UnboundedSender<Message>) {
    let tx = inbox.clone();
    bus.subscribe(Channel::OpenUpload, move |event| {
        if let BusEvent::OpenUpload(exec_id) = event {
            let _ = tx.send(Message::UploadDialogOpened(exec_id.clone()));
        }
    });

    let tx = inbox.clone();
    bus.subscribe(Channel::OpenConfigEditor, move |event| {
        if let BusEvent::OpenConfigEditor(exec_id) = event {
            let _ = tx.send(Message::ConfigEditorOpened(exec_id.clone()));
        }
    });

    let tx = inbox.clone();
    bus.subscribe(Channel::SelectTerminal, move |event| {
        if let BusEvent::SelectTerminal(exec_id) = event {
            let _ = tx.send(Message::TerminalSelect(exec_id.clone()));
        }
    });

    bus.subscribe(Channel::ClearTerminal, move |event| {
        if let BusEvent::ClearTerminal = event {
            let _ = inbox.send(Message::TerminalClear);
        }
    });
}
