//! Typed in-process event bus.
//!
//! Lets unrelated UI surfaces (upload dialog, config editor, terminal) react
//! to requests from the service list without knowing about each other.
//!
//! - The channel set is closed: one [`Channel`] per [`BusEvent`] variant.
//! - No buffering. A subscriber only sees events published after it
//!   subscribed.
//! - [`EventBus::publish`] is synchronous: every handler subscribed to the
//!   event's channel at publish time has run, in subscription order, before
//!   it returns.
//!
//! The bus is created once by the [`Engine`](crate::Engine) and lives as long
//! as it does.

use procdeck_core::ExecId;
use tracing::trace;

/// Event payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// Show the upload dialog for a service
    OpenUpload(ExecId),
    /// Show the config editor for a service
    OpenConfigEditor(ExecId),
    /// Bind the terminal to a service. An empty id detaches it.
    SelectTerminal(ExecId),
    /// Wipe the terminal scrollback
    ClearTerminal,
}

impl BusEvent {
    pub fn channel(&self) -> Channel {
        match self {
            BusEvent::OpenUpload(_) => Channel::OpenUpload,
            BusEvent::OpenConfigEditor(_) => Channel::OpenConfigEditor,
            BusEvent::SelectTerminal(_) => Channel::SelectTerminal,
            BusEvent::ClearTerminal => Channel::ClearTerminal,
        }
    }
}

/// Channel keys, one per event variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    OpenUpload,
    OpenConfigEditor,
    SelectTerminal,
    ClearTerminal,
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&BusEvent) + Send>;

struct Subscription {
    id: SubscriptionId,
    channel: Channel,
    handler: Handler,
}

/// Many-producer, many-consumer bus over [`BusEvent`].
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events on `channel`.
    pub fn subscribe<F>(&mut self, channel: Channel, handler: F) -> SubscriptionId
    where
        F: FnMut(&BusEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            channel,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Deliver `event` to every current subscriber of its channel.
    pub fn publish(&mut self, event: &BusEvent) {
        let channel = event.channel();
        trace!("bus: publish {:?}", event);
        for sub in self
            .subscriptions
            .iter_mut()
            .filter(|s| s.channel == channel)
        {
            (sub.handler)(event);
        }
    }

    pub fn subscriber_count(&self, channel: Channel) -> usize {
        self.subscriptions
            .iter()
            .filter(|s| s.channel == channel)
            .count()
    }
}
