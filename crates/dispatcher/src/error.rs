//! Dispatcher error types

use contracts::{DataItem, QueryId};
use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Subscriber creation error
    #[error("failed to create subscriber '{name}' for query {query_id}: {message}")]
    SubscriberCreation {
        query_id: QueryId,
        name: String,
        message: String,
    },

    /// Two subscriptions configured for the same query
    #[error("duplicate subscription for query {0}")]
    DuplicateQuery(QueryId),
}

impl DispatcherError {
    /// Create a subscriber creation error
    pub fn subscriber_creation(
        query_id: QueryId,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::SubscriberCreation {
            query_id,
            name: name.into(),
            message: message.into(),
        }
    }
}

/// The queue was completed; the rejected item is handed back
#[derive(Debug, Error)]
#[error("queue is completed, item for query {} rejected", .0.query_id)]
pub struct QueueClosed(pub DataItem);

/// Non-blocking push failure
#[derive(Debug, Error)]
pub enum TryPushError {
    /// Bounded queue is at capacity
    #[error("queue is full, item for query {} rejected", .0.query_id)]
    Full(DataItem),

    /// Queue was completed
    #[error("queue is completed, item for query {} rejected", .0.query_id)]
    Closed(DataItem),
}

impl TryPushError {
    /// Take back the rejected item
    pub fn into_inner(self) -> DataItem {
        match self {
            Self::Full(item) | Self::Closed(item) => item,
        }
    }
}
