//! FnSubscriber - adapts closures into a [`Subscriber`]

use contracts::{Subscriber, SubscriberError};

/// Subscriber backed by two closures
///
/// ```ignore
/// let sub = FnSubscriber::messages_only(|text: &str| {
///     println!("{text}");
///     Ok(())
/// });
/// ```
pub struct FnSubscriber<B, M> {
    begin: B,
    message: M,
}

impl<B, M> FnSubscriber<B, M>
where
    B: Fn() -> Result<(), SubscriberError> + Send + Sync,
    M: Fn(&str) -> Result<(), SubscriberError> + Send + Sync,
{
    pub fn new(begin: B, message: M) -> Self {
        Self { begin, message }
    }
}

type NoopBegin = fn() -> Result<(), SubscriberError>;

impl<M> FnSubscriber<NoopBegin, M>
where
    M: Fn(&str) -> Result<(), SubscriberError> + Send + Sync,
{
    /// Only handle messages; stream starts are accepted silently
    pub fn messages_only(message: M) -> Self {
        Self {
            begin: || Ok(()),
            message,
        }
    }
}

impl<B, M> Subscriber for FnSubscriber<B, M>
where
    B: Fn() -> Result<(), SubscriberError> + Send + Sync,
    M: Fn(&str) -> Result<(), SubscriberError> + Send + Sync,
{
    fn on_begin(&self) -> Result<(), SubscriberError> {
        (self.begin)()
    }

    fn on_message(&self, text: &str) -> Result<(), SubscriberError> {
        (self.message)(text)
    }
}
