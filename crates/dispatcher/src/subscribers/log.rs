//! LogSubscriber - logs stream events via tracing

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{Subscriber, SubscriberError};
use tracing::info;

/// Subscriber that logs every event for debugging
pub struct LogSubscriber {
    name: String,
    begins: AtomicU64,
    messages: AtomicU64,
}

impl LogSubscriber {
    /// Create a new LogSubscriber with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            begins: AtomicU64::new(0),
            messages: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stream starts seen
    pub fn begin_count(&self) -> u64 {
        self.begins.load(Ordering::Relaxed)
    }

    /// Number of messages seen
    pub fn message_count(&self) -> u64 {
        self.messages.load(Ordering::Relaxed)
    }
}

impl Subscriber for LogSubscriber {
    fn on_begin(&self) -> Result<(), SubscriberError> {
        self.begins.fetch_add(1, Ordering::Relaxed);
        info!(subscriber = %self.name, "Stream begin");
        Ok(())
    }

    fn on_message(&self, text: &str) -> Result<(), SubscriberError> {
        let seq = self.messages.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            subscriber = %self.name,
            seq,
            len = text.len(),
            message = %text,
            "Message received"
        );
        Ok(())
    }
}
