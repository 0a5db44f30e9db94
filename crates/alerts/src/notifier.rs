//! Notification sinks.

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::info;

/// Destination for formatted notification text.
///
/// Implementations never fail past this boundary: delivery problems are
/// logged and reported as `false`.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Attempt delivery, returning whether it succeeded.
    async fn send(&self, text: &str) -> bool;
}

/// Sink that only logs messages. Used for dry runs.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn send(&self, text: &str) -> bool {
        info!(message = text, "Dry run, notification not sent");
        true
    }
}

/// Mock sink that records every message it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
    /// Report every delivery as failed.
    pub fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink whose deliveries all fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Messages received so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, text: &str) -> bool {
        match self.messages.lock() {
            Ok(mut messages) => messages.push(text.to_string()),
            Err(poisoned) => poisoned.into_inner().push(text.to_string()),
        }
        !self.fail
    }
}
