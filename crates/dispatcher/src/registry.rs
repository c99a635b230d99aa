//! SubscriptionRegistry - shared query id -> subscription lookup table
//!
//! Written by the registration side, read by the dispatcher. Lookups clone
//! the `Arc` and release the lock before returning, so a callback may
//! register or unregister subscriptions (including its own) while it runs.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use contracts::{QueryId, Subscription};
use tracing::debug;

/// Concurrency-safe mapping from `QueryId` to `Subscription`
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    entries: RwLock<HashMap<QueryId, Arc<Subscription>>>,
}

impl SubscriptionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the subscription for its query id
    ///
    /// Returns the replaced subscription, if any.
    pub fn register(&self, subscription: Subscription) -> Option<Arc<Subscription>> {
        let query_id = subscription.query_id;
        let name = subscription.name.clone();
        let replaced = self.write().insert(query_id, Arc::new(subscription));
        debug!(
            query_id = %query_id,
            subscription = %name,
            replaced = replaced.is_some(),
            "Subscription registered"
        );
        replaced
    }

    /// Remove the subscription for `query_id`
    pub fn unregister(&self, query_id: QueryId) -> Option<Arc<Subscription>> {
        let removed = self.write().remove(&query_id);
        if removed.is_some() {
            debug!(query_id = %query_id, "Subscription unregistered");
        }
        removed
    }

    /// Point lookup
    pub fn get(&self, query_id: QueryId) -> Option<Arc<Subscription>> {
        self.read().get(&query_id).cloned()
    }

    /// Whether `query_id` is registered
    pub fn contains(&self, query_id: QueryId) -> bool {
        self.read().contains_key(&query_id)
    }

    /// Number of registered subscriptions
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered query ids, sorted
    pub fn query_ids(&self) -> Vec<QueryId> {
        let mut ids: Vec<_> = self.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    // A panic while holding the lock cannot leave the map half-updated
    // (every critical section is a single HashMap call), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<QueryId, Arc<Subscription>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<QueryId, Arc<Subscription>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FromIterator<Subscription> for SubscriptionRegistry {
    fn from_iter<I: IntoIterator<Item = Subscription>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|sub| (sub.query_id, Arc::new(sub)))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}
