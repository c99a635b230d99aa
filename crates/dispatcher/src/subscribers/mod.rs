//! Subscriber implementations
//!
//! Contains LogSubscriber, FileSubscriber, and FnSubscriber.

mod file;
mod func;
mod log;

pub use self::file::FileSubscriber;
pub use self::func::FnSubscriber;
pub use self::log::LogSubscriber;

use std::sync::Arc;

use contracts::{Subscriber, SubscriberType, SubscriptionConfig};
use tracing::instrument;

use crate::error::DispatcherError;

/// Create a subscriber from configuration
#[instrument(
    name = "dispatcher_create_subscriber",
    skip(config),
    fields(query_id = %config.query_id, subscription = %config.name, subscriber_type = ?config.subscriber_type)
)]
pub fn create_subscriber(config: &SubscriptionConfig) -> Result<Arc<dyn Subscriber>, DispatcherError> {
    match config.subscriber_type {
        SubscriberType::Log => Ok(Arc::new(LogSubscriber::new(&config.name))),
        SubscriberType::File => {
            let subscriber = FileSubscriber::from_params(&config.name, &config.params).map_err(|e| {
                DispatcherError::subscriber_creation(config.query_id, &config.name, e.to_string())
            })?;
            Ok(Arc::new(subscriber))
        }
    }
}
