//! Local copy of the service registry.
//!
//! Every fetch, whether from a poll tick or a refresh after a command
//! settles, draws a sequence number from the same counter. A result is
//! applied only if it belongs to the most recently issued request; older
//! results are discarded even if they arrive later. Applied results replace
//! the snapshot wholesale and are published to every subscriber.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, trace};

use procdeck_core::{ExecId, ServiceSnapshot};

/// Shared, immutable registry snapshot handed to subscribers.
pub type Snapshot = Arc<Vec<ServiceSnapshot>>;

/// Outcome of offering a fetch result to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A newer request has been issued since this one.
    Stale,
    /// The fetch failed; the previous snapshot stays.
    Failed,
}

#[derive(Debug)]
pub struct RegistryState {
    services: Snapshot,
    latest_issued: u64,
    applied: u64,
    /// Set after at least one successful fetch.
    loaded: bool,
    last_error: Option<String>,
    publisher: watch::Sender<Snapshot>,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryState {
    pub fn new() -> Self {
        let (publisher, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            services: Arc::new(Vec::new()),
            latest_issued: 0,
            applied: 0,
            loaded: false,
            last_error: None,
            publisher,
        }
    }

    /// Allocate the sequence number for a new fetch.
    pub fn issue(&mut self) -> u64 {
        self.latest_issued += 1;
        trace!("registry: issued fetch #{}", self.latest_issued);
        self.latest_issued
    }

    pub fn latest_issued(&self) -> u64 {
        self.latest_issued
    }

    /// Offer the result of fetch `seq`.
    pub fn apply(
        &mut self,
        seq: u64,
        result: Result<Vec<ServiceSnapshot>, String>,
    ) -> ApplyOutcome {
        match result {
            Err(error) => {
                debug!("registry: fetch #{} failed: {}", seq, error);
                if seq == self.latest_issued {
                    self.last_error = Some(error);
                }
                ApplyOutcome::Failed
            }
            Ok(_) if seq != self.latest_issued => {
                debug!(
                    "registry: discarding stale fetch #{} (latest #{})",
                    seq, self.latest_issued
                );
                ApplyOutcome::Stale
            }
            Ok(services) => {
                let snapshot = Arc::new(services);
                self.services = Arc::clone(&snapshot);
                self.applied = seq;
                self.loaded = true;
                self.last_error = None;
                self.publisher.send_replace(snapshot);
                ApplyOutcome::Applied
            }
        }
    }

    /// Receive every applied snapshot from now on. The receiver starts with
    /// the current snapshot marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.publisher.subscribe()
    }

    pub fn services(&self) -> &[ServiceSnapshot] {
        &self.services
    }

    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.services)
    }

    pub fn find(&self, exec_id: &ExecId) -> Option<&ServiceSnapshot> {
        self.services.iter().find(|s| &s.exec_id == exec_id)
    }

    pub fn position(&self, exec_id: &ExecId) -> Option<usize> {
        self.services.iter().position(|s| &s.exec_id == exec_id)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Sequence number of the snapshot currently shown.
    pub fn applied_seq(&self) -> u64 {
        self.applied
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procdeck_client::test_utils::test_service;

    fn names(state: &RegistryState) -> Vec<String> {
        state.services().iter().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn test_latest_issued_wins() {
        let mut reg = RegistryState::new();
        let first = reg.issue();
        let second = reg.issue();

        // Newer response arrives first
        assert_eq!(
            reg.apply(second, Ok(vec![test_service("a", "new")])),
            ApplyOutcome::Applied
        );
        // Older one arrives late and must not overwrite it
        assert_eq!(
            reg.apply(first, Ok(vec![test_service("a", "old")])),
            ApplyOutcome::Stale
        );
        assert_eq!(names(&reg), vec!["new"]);
        assert_eq!(reg.applied_seq(), second);
    }

    #[test]
    fn test_older_response_discarded_even_if_first_to_arrive() {
        let mut reg = RegistryState::new();
        let first = reg.issue();
        let _second = reg.issue();
        assert_eq!(
            reg.apply(first, Ok(vec![test_service("a", "old")])),
            ApplyOutcome::Stale
        );
        assert!(reg.is_empty());
        assert!(!reg.is_loaded());
    }

    #[test]
    fn test_failure_keeps_previous_snapshot() {
        let mut reg = RegistryState::new();
        let seq = reg.issue();
        reg.apply(seq, Ok(vec![test_service("a", "one")]));

        let seq = reg.issue();
        assert_eq!(
            reg.apply(seq, Err("connection refused".into())),
            ApplyOutcome::Failed
        );
        assert_eq!(names(&reg), vec!["one"]);
        assert_eq!(reg.last_error(), Some("connection refused"));

        let seq = reg.issue();
        reg.apply(seq, Ok(vec![test_service("a", "one")]));
        assert_eq!(reg.last_error(), None);
    }

    #[test]
    fn test_snapshot_fully_replaces() {
        let mut reg = RegistryState::new();
        let seq = reg.issue();
        reg.apply(seq, Ok(vec![test_service("a", "a"), test_service("b", "b")]));
        let seq = reg.issue();
        reg.apply(seq, Ok(vec![test_service("c", "c")]));
        assert_eq!(names(&reg), vec!["c"]);
        assert!(reg.find(&ExecId::from("a")).is_none());
    }

    #[tokio::test]
    async fn test_subscribers_receive_applied_snapshots() {
        let mut reg = RegistryState::new();
        let mut rx1 = reg.subscribe();
        let mut rx2 = reg.subscribe();

        let seq = reg.issue();
        reg.apply(seq, Ok(vec![test_service("a", "one")]));

        rx1.changed().await.unwrap();
        rx2.changed().await.unwrap();
        assert_eq!(rx1.borrow_and_update()[0].name, "one");
        assert_eq!(rx2.borrow_and_update()[0].name, "one");
    }

    #[test]
    fn test_stale_result_is_not_published() {
        let mut reg = RegistryState::new();
        let rx = reg.subscribe();
        let first = reg.issue();
        reg.issue();
        reg.apply(first, Ok(vec![test_service("a", "old")]));
        assert!(!rx.has_changed().unwrap());
    }
}
