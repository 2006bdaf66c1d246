//! Message processing with event bus routing
//!
//! Runs the TEA update loop for one incoming message. Bus publications are
//! delivered synchronously: subscribers translate events into messages on the
//! bus inbox, and those are processed before this function returns, so every
//! effect of a keypress lands before the next render.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::trace;

use procdeck_client::Backend;

use crate::actions::handle_action;
use crate::bus::EventBus;
use crate::handler::{self, UpdateAction};
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<B>(
    state: &mut AppState,
    message: Message,
    backend: &Arc<B>,
    msg_tx: &mpsc::Sender<Message>,
    bus: &mut EventBus,
    bus_inbox: &mut mpsc::UnboundedReceiver<Message>,
) where
    B: Backend + Sync + 'static,
{
    let mut queue = VecDeque::from([message]);

    while let Some(next) = queue.pop_front() {
        let mut msg = Some(next);
        while let Some(m) = msg {
            let result = handler::update(state, m);

            match result.action {
                Some(UpdateAction::Publish(event)) => {
                    bus.publish(&event);
                    while let Ok(routed) = bus_inbox.try_recv() {
                        trace!("bus delivered {:?}", routed);
                        queue.push_back(routed);
                    }
                }
                Some(action) => handle_action(action, backend, msg_tx.clone()),
                None => {}
            }

            // Continue with follow-up message
            msg = result.message;
        }
    }
}
