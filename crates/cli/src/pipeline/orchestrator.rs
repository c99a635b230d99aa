//! Pipeline orchestrator - wires the feed, the queue and the dispatcher.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::StreamBlueprint;
use dispatcher::{create_dispatcher, CancellationToken, DataQueue};
use ingestion::Feed;
use tracing::{info, warn};

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The stream blueprint configuration
    pub blueprint: StreamBlueprint,

    /// Pipeline timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
    cancel: CancellationToken,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops both the feed and the dispatcher
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the pipeline until the feed is drained or the token fires
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let (producer, consumer) = DataQueue::with_capacity(blueprint.queue.capacity);

        let dispatcher = create_dispatcher(&blueprint.subscriptions, consumer, self.cancel.clone())
            .context("Failed to create dispatcher")?;
        let metrics = dispatcher.metrics();
        let dispatcher_handle = dispatcher.spawn();

        let feed = Feed::from_config(&blueprint.feed);
        info!(
            feed = feed.kind(),
            capacity = ?blueprint.queue.capacity,
            subscriptions = blueprint.subscriptions.len(),
            "Pipeline started"
        );
        let feed_handle = feed.start(producer, self.cancel.clone());

        if let Some(timeout) = self.config.timeout {
            let cancel = self.cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(timeout) => {
                        warn!(timeout_secs = timeout.as_secs_f64(), "Pipeline timeout reached, cancelling");
                        cancel.cancel();
                    }
                }
            });
        }

        let stop_reason = dispatcher_handle
            .await
            .context("Dispatcher task panicked")?;

        // The dispatcher only stops on completion or cancellation; in both
        // cases the feed has nothing left to deliver.
        self.cancel.cancel();

        let feed_report = feed_handle
            .await
            .context("Feed task panicked")?
            .context("Feed failed")?;

        Ok(PipelineStats {
            stop_reason,
            feed: feed_report,
            dispatch: metrics.snapshot(),
            subscriptions: blueprint.subscriptions.len(),
            duration: start_time.elapsed(),
        })
    }
}
