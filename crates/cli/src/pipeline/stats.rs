//! Pipeline statistics.

use std::time::Duration;

use dispatcher::{DispatchSnapshot, StopReason};
use ingestion::FeedReport;

/// Statistics from a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Why the dispatcher stopped
    pub stop_reason: StopReason,

    /// Producer side outcome
    pub feed: FeedReport,

    /// Dispatcher counters
    pub dispatch: DispatchSnapshot,

    /// Number of configured subscriptions
    pub subscriptions: usize,

    /// Total duration of the pipeline run
    pub duration: Duration,
}

impl PipelineStats {
    /// Items taken per second
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.dispatch.taken as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Dispatch Statistics ===\n");

        println!("Overview");
        println!("   ├─ Stop reason: {:?}", self.stop_reason);
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Throughput: {:.2} items/s", self.throughput());
        println!("   └─ Subscriptions: {}", self.subscriptions);

        println!("\nFeed");
        println!("   ├─ Produced: {}", self.feed.produced);
        println!("   ├─ Skipped (malformed): {}", self.feed.skipped);
        println!("   └─ Cancelled: {}", self.feed.cancelled);

        println!("\nDispatcher");
        println!("   ├─ Taken: {}", self.dispatch.taken);
        println!("   ├─ Dispatched: {}", self.dispatch.dispatched);
        println!("   ├─ Unknown query id: {}", self.dispatch.unknown);
        println!("   ├─ Subscriber faults: {}", self.dispatch.faults);
        println!("   └─ Callback latency (ms): {}", self.dispatch.latency_ms);

        println!();
    }
}
