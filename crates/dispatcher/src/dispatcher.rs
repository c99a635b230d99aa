//! Dispatcher - main loop routing queued items to subscriber callbacks

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use contracts::{DataItem, Subscriber, SubscriberError, Subscription, SubscriptionConfig};
use observability::DispatchOutcome;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::error::DispatcherError;
use crate::metrics::DispatchMetrics;
use crate::queue::{ItemQueue, QueueConsumer, Take};
use crate::registry::SubscriptionRegistry;
use crate::subscribers::create_subscriber;

/// Why [`Dispatcher::process`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The queue reported that no more items will arrive
    Completed,
    /// The cancellation token fired while waiting for an item
    Cancelled,
}

/// Single-consumer loop that drains the queue and invokes subscriber callbacks
///
/// The registry, queue and token are shared handles; the dispatcher only
/// reads the registry and only consumes from the queue.
pub struct Dispatcher<Q = QueueConsumer> {
    subscriptions: Arc<SubscriptionRegistry>,
    queue: Q,
    cancel: CancellationToken,
    metrics: Arc<DispatchMetrics>,
}

impl<Q: ItemQueue> Dispatcher<Q> {
    /// Create a dispatcher over shared collaborators
    pub fn new(subscriptions: Arc<SubscriptionRegistry>, queue: Q, cancel: CancellationToken) -> Self {
        Self {
            subscriptions,
            queue,
            cancel,
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Shared metrics, readable while and after the loop runs
    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the dispatcher main loop
    ///
    /// Returns when the queue is completed or the token fires during a take.
    /// Callback faults and unknown query ids are logged and never end the loop.
    /// Consumes the dispatcher: it runs once per stream.
    #[instrument(name = "dispatcher_process", skip(self))]
    pub async fn process(self) -> StopReason {
        info!(subscriptions = self.subscriptions.len(), "Start dispatching");

        loop {
            if self.queue.is_completed() {
                info!(
                    taken = self.metrics.taken(),
                    "Data queue completed, stop processing"
                );
                return StopReason::Completed;
            }

            let item = match self.queue.take(&self.cancel).await {
                Take::Item(item) => item,
                Take::Completed => {
                    info!(
                        taken = self.metrics.taken(),
                        "Data queue completed, stop processing"
                    );
                    return StopReason::Completed;
                }
                Take::Cancelled => {
                    info!(
                        taken = self.metrics.taken(),
                        "Taking data cancelled, stop processing"
                    );
                    return StopReason::Cancelled;
                }
            };

            self.metrics.inc_taken();
            observability::record_item_taken();

            let outcome = self.dispatch(&item);
            observability::record_dispatch_outcome(outcome);

            let taken = self.metrics.taken();
            if taken % 1000 == 0 {
                debug!(taken, "Dispatcher progress");
            }
        }
    }

    /// Spawn the dispatcher as a background task
    pub fn spawn(self) -> JoinHandle<StopReason>
    where
        Q: Sync + 'static,
    {
        tokio::spawn(self.process())
    }

    fn dispatch(&self, item: &DataItem) -> DispatchOutcome {
        let Some(subscription) = self.subscriptions.get(item.query_id) else {
            warn!(query_id = %item.query_id, "Unexpected subscription id");
            self.metrics.inc_unknown();
            return DispatchOutcome::Unknown;
        };

        let started = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            invoke(subscription.subscriber.as_ref(), item)
        }));
        self.metrics.record_latency(started.elapsed());

        let fault = match result {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(payload) => Some(format!("panicked: {}", panic_message(payload.as_ref()))),
        };

        match fault {
            None => {
                self.metrics.inc_dispatched();
                DispatchOutcome::Dispatched
            }
            Some(detail) => {
                error!(
                    item = %item,
                    subscription = %subscription.name,
                    error = %detail,
                    "Subscriber failed while dispatching data"
                );
                self.metrics.inc_faults();
                DispatchOutcome::Fault
            }
        }
    }
}

fn invoke(subscriber: &dyn Subscriber, item: &DataItem) -> Result<(), SubscriberError> {
    if item.is_begin() {
        subscriber.on_begin()
    } else {
        subscriber.on_message(&item.value)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Build a registry from subscription configs using the built-in subscribers
#[instrument(name = "dispatcher_create_registry", skip(configs), fields(count = configs.len()))]
pub fn create_registry(
    configs: &[SubscriptionConfig],
) -> Result<Arc<SubscriptionRegistry>, DispatcherError> {
    let registry = SubscriptionRegistry::new();
    for config in configs {
        let subscriber = create_subscriber(config)?;
        let subscription = Subscription::new(config.query_id, &config.name, subscriber);
        if registry.register(subscription).is_some() {
            return Err(DispatcherError::DuplicateQuery(config.query_id));
        }
    }
    Ok(Arc::new(registry))
}

/// Convenience function to create a dispatcher from subscription configs
#[instrument(name = "dispatcher_create", skip(configs, queue, cancel))]
pub fn create_dispatcher(
    configs: &[SubscriptionConfig],
    queue: QueueConsumer,
    cancel: CancellationToken,
) -> Result<Dispatcher, DispatcherError> {
    let registry = create_registry(configs)?;
    Ok(Dispatcher::new(registry, queue, cancel))
}
