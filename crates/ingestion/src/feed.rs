//! Feed - unified entry point over the concrete producers

use std::time::Duration;

use contracts::{DataItem, FeedConfig};
use dispatcher::QueueProducer;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::mock::{MockFeed, MockFeedConfig};
use crate::replay::ReplayFeed;

/// Outcome of one feed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedReport {
    /// Items pushed into the queue
    pub produced: u64,
    /// Malformed input skipped
    pub skipped: u64,
    /// Whether the run stopped on cancellation
    pub cancelled: bool,
}

/// Producer configured from a [`FeedConfig`]
#[derive(Debug, Clone)]
pub enum Feed {
    Mock(MockFeed),
    Replay(ReplayFeed),
}

impl Feed {
    /// Build from configuration
    pub fn from_config(config: &FeedConfig) -> Self {
        match config {
            FeedConfig::Mock {
                query_ids,
                messages_per_query,
                interval_ms,
            } => Self::Mock(MockFeed::new(MockFeedConfig {
                query_ids: query_ids.clone(),
                messages_per_query: *messages_per_query,
                interval: Duration::from_millis(*interval_ms),
            })),
            FeedConfig::Replay { path, interval_ms } => Self::Replay(ReplayFeed::new(
                path.clone(),
                Duration::from_millis(*interval_ms),
            )),
        }
    }

    /// Feed type name (used for logging/metrics)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mock(_) => "mock",
            Self::Replay(_) => "replay",
        }
    }

    /// Run the feed on a background task
    ///
    /// The queue is completed when the task ends, whatever the outcome.
    pub fn start(
        self,
        producer: QueueProducer,
        cancel: CancellationToken,
    ) -> JoinHandle<Result<FeedReport>> {
        tokio::spawn(async move {
            let result = match self {
                Self::Mock(feed) => feed.run(&producer, &cancel).await,
                Self::Replay(feed) => feed.run(&producer, &cancel).await,
            };
            producer.complete();
            result
        })
    }
}

/// Push one item, giving up when `cancel` fires first
///
/// Returns `Ok(false)` on cancellation.
pub(crate) async fn push_or_cancel(
    producer: &QueueProducer,
    cancel: &CancellationToken,
    item: DataItem,
) -> Result<bool> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Ok(false),
        pushed = producer.push(item) => {
            pushed?;
            Ok(true)
        }
    }
}

/// Sleep between items; returns `false` if cancelled meanwhile
pub(crate) async fn pace(interval: Duration, cancel: &CancellationToken) -> bool {
    if interval.is_zero() {
        return !cancel.is_cancelled();
    }
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(interval) => true,
    }
}
