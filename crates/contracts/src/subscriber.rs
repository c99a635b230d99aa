//! Subscriber trait - Dispatcher output interface
//!
//! Defines the callback side of a query subscription.

use std::fmt;
use std::sync::Arc;

use crate::{QueryId, SubscriberError};

/// Callback handle for one query's data stream
///
/// Implemented by whatever consumer logic the application provides.
/// The dispatcher calls exactly one of these methods per item taken from the
/// queue, always from the same task, in queue order.
///
/// # Faults
///
/// A returned `Err` and a panic are both treated as a fault. The dispatcher
/// logs the fault with the offending item and keeps going; the subscriber
/// stays registered and receives later items.
///
/// A panic still runs the process panic hook before it is caught, and the
/// default hook prints to stderr. `observability::install_panic_hook`
/// (installed by `init_with_config`) sends that report through `tracing`
/// instead.
///
/// # Example
///
/// ```ignore
/// struct Printer;
///
/// impl Subscriber for Printer {
///     fn on_begin(&self) -> Result<(), SubscriberError> {
///         println!("stream started");
///         Ok(())
///     }
///
///     fn on_message(&self, text: &str) -> Result<(), SubscriberError> {
///         println!("{text}");
///         Ok(())
///     }
/// }
/// ```
pub trait Subscriber: Send + Sync {
    /// Called when the query's stream starts
    fn on_begin(&self) -> Result<(), SubscriberError>;

    /// Called for every message body
    fn on_message(&self, text: &str) -> Result<(), SubscriberError>;
}

/// Active registration of a subscriber for a query
#[derive(Clone)]
pub struct Subscription {
    /// Lookup key
    pub query_id: QueryId,

    /// Human readable name (used for logging/metrics)
    pub name: String,

    /// Callback handle
    pub subscriber: Arc<dyn Subscriber>,
}

impl Subscription {
    /// Create a new subscription
    pub fn new(
        query_id: impl Into<QueryId>,
        name: impl Into<String>,
        subscriber: Arc<dyn Subscriber>,
    ) -> Self {
        Self {
            query_id: query_id.into(),
            name: name.into(),
            subscriber,
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("query_id", &self.query_id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
