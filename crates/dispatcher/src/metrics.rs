//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use observability::{RunningStats, StatsSummary};

/// Counters for one dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Items taken from the queue
    taken: AtomicU64,
    /// Items delivered to a callback that returned normally
    dispatched: AtomicU64,
    /// Items dropped because no subscription matched
    unknown: AtomicU64,
    /// Items whose callback returned an error or panicked
    faults: AtomicU64,
    /// Callback latency in milliseconds
    latency_ms: Mutex<RunningStats>,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn taken(&self) -> u64 {
        self.taken.load(Ordering::Relaxed)
    }

    pub fn inc_taken(&self) {
        self.taken.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    pub fn inc_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn unknown(&self) -> u64 {
        self.unknown.load(Ordering::Relaxed)
    }

    pub fn inc_unknown(&self) {
        self.unknown.fetch_add(1, Ordering::Relaxed);
    }

    pub fn faults(&self) -> u64 {
        self.faults.load(Ordering::Relaxed)
    }

    pub fn inc_faults(&self) {
        self.faults.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one callback invocation's duration
    pub fn record_latency(&self, elapsed: Duration) {
        let ms = elapsed.as_secs_f64() * 1000.0;
        self.latency_ms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ms);
        observability::record_callback_latency_ms(ms);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            taken: self.taken(),
            dispatched: self.dispatched(),
            unknown: self.unknown(),
            faults: self.faults(),
            latency_ms: self
                .latency_ms
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .summary(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Default)]
pub struct DispatchSnapshot {
    pub taken: u64,
    pub dispatched: u64,
    pub unknown: u64,
    pub faults: u64,
    pub latency_ms: StatsSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot() {
        let metrics = DispatchMetrics::new();
        metrics.inc_taken();
        metrics.inc_taken();
        metrics.inc_dispatched();
        metrics.inc_unknown();
        metrics.record_latency(Duration::from_millis(2));

        let snap = metrics.snapshot();
        assert_eq!(snap.taken, 2);
        assert_eq!(snap.dispatched, 1);
        assert_eq!(snap.unknown, 1);
        assert_eq!(snap.faults, 0);
        assert_eq!(snap.latency_ms.count, 1);
        assert!((snap.latency_ms.mean - 2.0).abs() < 1e-6);
    }
}
