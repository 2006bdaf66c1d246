//! Transient toast notifications.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

/// Maximum toasts kept at once; older ones are dropped first.
const MAX_NOTIFICATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// Wall-clock time, for display
    pub timestamp: DateTime<Local>,
    created_at: Instant,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
            created_at: Instant::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

#[derive(Debug, Clone)]
pub struct Notifications {
    items: VecDeque<Notification>,
    duration: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}

impl Notifications {
    pub fn new(duration: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            duration,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        tracing::debug!(
            "notification ({:?}): {}",
            notification.level,
            notification.message
        );
        if self.items.len() == MAX_NOTIFICATIONS {
            self.items.pop_front();
        }
        self.items.push_back(notification);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Success, message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Info, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Error, message));
    }

    /// Drop every notification older than the configured duration.
    pub fn prune_at(&mut self, now: Instant) {
        let duration = self.duration;
        self.items
            .retain(|n| now.saturating_duration_since(n.created_at) < duration);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_expires_old_entries() {
        let mut n = Notifications::new(Duration::from_millis(100));
        n.success("done");
        assert_eq!(n.len(), 1);

        n.prune_at(Instant::now());
        assert_eq!(n.len(), 1);

        n.prune_at(Instant::now() + Duration::from_millis(150));
        assert!(n.is_empty());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut n = Notifications::default();
        for i in 0..(MAX_NOTIFICATIONS + 2) {
            n.info(format!("msg {i}"));
        }
        assert_eq!(n.len(), MAX_NOTIFICATIONS);
        assert_eq!(n.iter().next().unwrap().message, "msg 2");
        assert_eq!(n.latest().unwrap().message, format!("msg {}", MAX_NOTIFICATIONS + 1));
    }

    #[test]
    fn test_levels() {
        let mut n = Notifications::default();
        n.error("boom");
        assert!(n.latest().unwrap().is_error());
    }
}
