//! Notification sinks receiving "update available" messages

#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::resolve::filter::Notification;

/// Trait for the presentation side that shows notifications
#[cfg_attr(test, automock)]
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify(&self, notification: &Notification) {
        info!(title = %notification.title, "{}", notification.body);
    }
}

/// Forwards notifications to a channel consumed by the presentation layer
#[derive(Debug, Clone)]
pub struct ChannelNotificationSink {
    tx: UnboundedSender<Notification>,
}

impl ChannelNotificationSink {
    pub fn new(tx: UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelNotificationSink {
    fn notify(&self, notification: &Notification) {
        if self.tx.send(notification.clone()).is_err() {
            warn!(
                "Notification receiver dropped, discarding notification for {}",
                notification.title
            );
        }
    }
}
