//! Time-bounded cache for read-mostly UI values.
//!
//! Holds the "today's session" value between screen reads; the sync engine
//! invalidates it whenever the timeline is resynced.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Cache key for the current day's session value
pub const TODAY_SESSION_KEY: &str = "today_session";

struct CachedValue {
    value: Value,
    written_at: Instant,
}

/// Keyed value cache with age-based expiry
#[derive(Default)]
pub struct SessionCache {
    entries: Mutex<HashMap<String, CachedValue>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CachedValue>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Read a cached value no older than `max_age`
    pub fn read(&self, key: &str, max_age: Duration) -> Option<Value> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(cached) if cached.written_at.elapsed() <= max_age => Some(cached.value.clone()),
            Some(_) => {
                entries.remove(key);
                tracing::debug!("Cache entry '{}' expired", key);
                None
            }
            None => None,
        }
    }

    pub fn write(&self, key: &str, value: Value) {
        self.lock().insert(
            key.to_string(),
            CachedValue {
                value,
                written_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, key: &str) {
        if self.lock().remove(key).is_some() {
            tracing::debug!("Cache entry '{}' invalidated", key);
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_then_read() {
        let cache = SessionCache::new();
        cache.write("k", json!({"n": 1}));
        let value = cache.read("k", Duration::from_secs(60)).unwrap();
        assert_eq!(value["n"], 1);
    }

    #[test]
    fn test_expired_value_is_dropped() {
        let cache = SessionCache::new();
        cache.write("k", json!(1));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.read("k", Duration::from_millis(1)).is_none());
        // The expired entry was removed, not just hidden
        assert!(cache.read("k", Duration::from_secs(60)).is_none());
    }

    #[test]
    fn test_invalidate() {
        let cache = SessionCache::new();
        cache.write("k", json!(1));
        cache.invalidate("k");
        assert!(cache.read("k", Duration::from_secs(60)).is_none());
    }

    #[test]
    fn test_invalidate_missing_key_is_noop() {
        let cache = SessionCache::new();
        cache.invalidate("missing");
    }
}
