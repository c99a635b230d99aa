//! DataQueue - blocking FIFO between the producer and the dispatcher
//!
//! Built on `async-channel`. The queue is "completed" once the producer
//! side is closed (explicitly or by dropping every producer) AND every
//! remaining item has been taken.

use async_channel::{Receiver, Sender};
use contracts::DataItem;
use tokio_util::sync::CancellationToken;

use crate::error::{QueueClosed, TryPushError};

/// Result of a cancellable take
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Take {
    /// An item was obtained
    Item(DataItem),
    /// No more items will ever arrive
    Completed,
    /// The cancellation token fired while waiting
    Cancelled,
}

/// Consumer side of the queue boundary
///
/// Implemented by [`QueueConsumer`]; tests substitute scripted queues.
#[trait_variant::make(ItemQueue: Send)]
pub trait LocalItemQueue {
    /// Non-blocking check: closed and drained
    fn is_completed(&self) -> bool;

    /// Wait for the next item, the completed state, or cancellation,
    /// whichever happens first
    async fn take(&self, cancel: &CancellationToken) -> Take;
}

/// Queue constructors
pub struct DataQueue;

impl DataQueue {
    /// Bounded queue; `push` waits while `capacity` items are pending
    ///
    /// A capacity of 0 is treated as 1.
    pub fn bounded(capacity: usize) -> (QueueProducer, QueueConsumer) {
        let (tx, rx) = async_channel::bounded(capacity.max(1));
        (QueueProducer { tx }, QueueConsumer { rx })
    }

    /// Unbounded queue
    pub fn unbounded() -> (QueueProducer, QueueConsumer) {
        let (tx, rx) = async_channel::unbounded();
        (QueueProducer { tx }, QueueConsumer { rx })
    }

    /// Bounded when `capacity` is set, unbounded otherwise
    pub fn with_capacity(capacity: Option<usize>) -> (QueueProducer, QueueConsumer) {
        match capacity {
            Some(capacity) => Self::bounded(capacity),
            None => Self::unbounded(),
        }
    }
}

/// Producer side of the queue
#[derive(Debug, Clone)]
pub struct QueueProducer {
    tx: Sender<DataItem>,
}

impl QueueProducer {
    /// Enqueue an item, waiting for room when the queue is bounded and full
    ///
    /// # Errors
    /// Returns the item back if the queue was completed.
    pub async fn push(&self, item: DataItem) -> Result<(), QueueClosed> {
        self.tx
            .send(item)
            .await
            .map_err(|e| QueueClosed(e.into_inner()))
    }

    /// Enqueue without waiting
    pub fn try_push(&self, item: DataItem) -> Result<(), TryPushError> {
        self.tx.try_send(item).map_err(|e| match e {
            async_channel::TrySendError::Full(item) => TryPushError::Full(item),
            async_channel::TrySendError::Closed(item) => TryPushError::Closed(item),
        })
    }

    /// Mark the queue completed: no more items will be produced
    ///
    /// Items already enqueued stay takeable. Returns `false` if the queue
    /// was already completed.
    pub fn complete(&self) -> bool {
        self.tx.close()
    }

    /// Whether the queue is closed and drained
    pub fn is_completed(&self) -> bool {
        self.tx.is_closed() && self.tx.is_empty()
    }

    /// Number of pending items
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    /// Whether no items are pending
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}

/// Consumer side of the queue
#[derive(Debug, Clone)]
pub struct QueueConsumer {
    rx: Receiver<DataItem>,
}

impl QueueConsumer {
    /// Number of pending items
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether no items are pending
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl ItemQueue for QueueConsumer {
    fn is_completed(&self) -> bool {
        self.rx.is_closed() && self.rx.is_empty()
    }

    async fn take(&self, cancel: &CancellationToken) -> Take {
        // Cancellation is polled first so an already-fired token wins
        // over items that are still pending.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Take::Cancelled,
            received = self.rx.recv() => match received {
                Ok(item) => Take::Item(item),
                Err(_) => Take::Completed,
            },
        }
    }
}
