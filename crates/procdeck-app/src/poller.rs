//! Registry poll timer.
//!
//! The poller only produces [`Message::PollTick`]. Sequence numbers, fetches
//! and stale-result handling live in [`RegistryState`](crate::RegistryState)
//! and the update loop, so refreshes requested by the dispatcher share the
//! same counter as timer ticks.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::message::Message;

/// Lower bound for the poll interval.
pub const MIN_POLL_INTERVAL_MS: u64 = 250;

/// Default poll interval.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Owns the running poll task. Dropping the handle stops it.
#[derive(Debug)]
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
    interval: Duration,
}

/// Start ticking: once immediately, then every `interval_ms` (clamped to
/// [`MIN_POLL_INTERVAL_MS`]).
pub fn start(interval_ms: u64, msg_tx: mpsc::Sender<Message>) -> PollerHandle {
    let interval = Duration::from_millis(interval_ms.max(MIN_POLL_INTERVAL_MS));
    let (shutdown, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!("Registry poller started ({}ms)", interval.as_millis());
        // First tick of a tokio interval completes immediately
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if msg_tx.send(Message::PollTick).await.is_err() {
                        debug!("Registry poller: message channel closed");
                        break;
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        debug!("Registry poller stopped");
    });

    PollerHandle {
        shutdown,
        task: Some(task),
        interval,
    }
}

impl PollerHandle {
    /// Effective interval after clamping.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the timer and wait for the task to exit.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}
