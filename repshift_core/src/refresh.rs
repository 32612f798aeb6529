//! Session refresh broadcast.
//!
//! An explicit observer registry owned by the application root and passed by
//! injection. `trigger_refetch` clears the session cache and then invokes
//! every registered listener synchronously; a panicking listener is caught
//! and logged so it cannot block the others.

use crate::cache::{SessionCache, TODAY_SESSION_KEY};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by `subscribe`; pass back to `unsubscribe`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Registry of session-refetch listeners
pub struct RefreshBus {
    cache: Arc<SessionCache>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_id: AtomicU64,
}

impl RefreshBus {
    pub fn new(cache: Arc<SessionCache>) -> Self {
        Self {
            cache,
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Listener)>> {
        match self.listeners.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register a refetch listener
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, Arc::new(callback)));
        SubscriptionId(id)
    }

    /// Remove a previously registered listener
    pub fn unsubscribe(&self, subscription: SubscriptionId) {
        self.lock().retain(|(id, _)| *id != subscription.0);
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    /// Clear the cached today-session value and invoke every listener.
    ///
    /// Listeners run synchronously, in registration order, outside the
    /// registry lock so a listener may subscribe or unsubscribe.
    pub fn trigger_refetch(&self) {
        self.cache.invalidate(TODAY_SESSION_KEY);

        let snapshot: Vec<(u64, Listener)> = self.lock().clone();
        for (id, listener) in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener())).is_err() {
                tracing::warn!("Refetch listener {} panicked; continuing", id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn test_bus() -> (Arc<SessionCache>, RefreshBus) {
        let cache = Arc::new(SessionCache::new());
        let bus = RefreshBus::new(cache.clone());
        (cache, bus)
    }

    #[test]
    fn test_listeners_invoked_in_order() {
        let (_cache, bus) = test_bus();
        let calls = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second"] {
            let calls = calls.clone();
            bus.subscribe(move || calls.lock().unwrap().push(label));
        }

        bus.trigger_refetch();
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let (_cache, bus) = test_bus();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        let subscription = bus.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.trigger_refetch();
        bus.unsubscribe(subscription);
        bus.trigger_refetch();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_panicking_listener_does_not_block_others() {
        let (_cache, bus) = test_bus();
        let count = Arc::new(AtomicUsize::new(0));

        bus.subscribe(|| panic!("listener failure"));
        let counter = count.clone();
        bus.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.trigger_refetch();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_refetch_clears_today_session_cache() {
        let (cache, bus) = test_bus();
        cache.write(TODAY_SESSION_KEY, json!({"day": "push"}));

        bus.trigger_refetch();
        assert!(cache
            .read(TODAY_SESSION_KEY, Duration::from_secs(60))
            .is_none());
    }
}
