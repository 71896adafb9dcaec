//! Transient user notifications
//!
//! Fetch failures are reported through a [`Notifier`] and never block the
//! caller. Front-ends decide how to show them.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

pub const RECIPES_FETCH_FAILED: &str = "Error fetching recipes";
pub const CATEGORIES_FETCH_FAILED: &str = "Error fetching categories";
pub const ALLERGIES_FETCH_FAILED: &str = "Error fetching allergies";
pub const DIFFICULTIES_FETCH_FAILED: &str = "Error fetching difficulties";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }
}

/// Sink for transient notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Forwards notifications to an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            debug!("Notification dropped, no receiver");
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: Notification) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_notifier_forwards() {
        let (notifier, mut rx) = ChannelNotifier::channel();
        notifier.notify(Notification::error(RECIPES_FETCH_FAILED));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.level, NotificationLevel::Error);
        assert_eq!(received.message, "Error fetching recipes");
        assert!(rx.try_recv().is_err());
    }
}
