//! Shared TTL Cache
//!
//! Thread-safe handle over [`CacheStore`]. A single mutex guards the map and
//! the counters, so every operation is atomic with respect to the others.
//! No operation suspends while holding the lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::cache::{CacheStats, CacheStore};
use crate::error::Result;

// == TTL Cache ==
/// Process-wide expiring key/value cache.
///
/// Cloning yields another handle to the same store; the instance is built
/// once at startup and passed to whoever needs it.
#[derive(Debug, Clone)]
pub struct TtlCache {
    inner: Arc<Mutex<CacheStore>>,
}

impl TtlCache {
    /// Creates a cache whose entries default to `default_ttl`.
    ///
    /// Fails when `default_ttl` is zero.
    pub fn new(default_ttl: Duration) -> Result<Self> {
        Ok(Self::from_store(CacheStore::new(default_ttl)?))
    }

    pub fn from_store(store: CacheStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    // A panic while holding the lock cannot leave the map half-updated:
    // every mutation is a single HashMap call, so the poisoned state is usable.
    pub(crate) fn lock(&self) -> MutexGuard<'_, CacheStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the value under `key`, or `None` when absent or expired.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key)
    }

    /// Stores `value` under `key` for `ttl` (or the default TTL).
    pub fn set(&self, key: impl Into<String>, value: Value, ttl: Option<Duration>) {
        self.lock().set(key.into(), value, ttl);
    }

    /// Removes `key` if present. Returns whether anything was removed.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().delete(key)
    }

    /// Drops all entries and zeroes the counters.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Sweeps entries expired at call time and returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        self.lock().cleanup_expired()
    }

    pub fn get_stats(&self) -> CacheStats {
        self.lock().stats()
    }

    pub fn get_keys(&self) -> Vec<String> {
        self.lock().keys()
    }

    // == Typed Access ==
    /// Serializes `value` and stores it.
    ///
    /// The write is reported instead of swallowed: an error means nothing
    /// was stored and any previous entry for `key` is untouched.
    pub fn put<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()> {
        let document = serde_json::to_value(value)?;
        self.set(key, document, ttl);
        Ok(())
    }

    /// Reads `key` back as a `T`.
    ///
    /// A stored document of the wrong shape is removed and the lookup is
    /// counted as a miss, so the caller can rebuild and store it again.
    pub fn fetch<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut store = self.lock();
        let document = store.get(key)?;
        match serde_json::from_value(document) {
            Ok(value) => Some(value),
            Err(err) => {
                store.discard_hit(key);
                warn!("Discarded cached value for '{}' with unexpected shape: {}", key, err);
                None
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use serde::ser::Error as _;
    use serde::Serializer;
    use serde_json::json;
    use std::collections::HashMap;
    use std::thread;

    fn cache() -> TtlCache {
        TtlCache::new(Duration::from_secs(300)).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_ttl() {
        assert!(matches!(
            TtlCache::new(Duration::ZERO),
            Err(CacheError::InvalidTtl(_))
        ));
    }

    #[test]
    fn test_clones_share_state() {
        let cache = cache();
        let other = cache.clone();

        cache.set("trade_summary:USA:CHN:2018:2022", json!([1, 2, 3]), None);

        assert_eq!(
            other.get("trade_summary:USA:CHN:2018:2022"),
            Some(json!([1, 2, 3]))
        );
    }

    #[test]
    fn test_returned_value_is_a_snapshot() {
        let cache = cache();
        cache.set("k", json!({"count": 1}), None);

        let mut copy = cache.get("k").unwrap();
        copy["count"] = json!(99);

        assert_eq!(cache.get("k"), Some(json!({"count": 1})));
    }

    #[test]
    fn test_put_and_fetch_typed() {
        let cache = cache();
        let mut mappings = HashMap::new();
        mappings.insert("USA".to_string(), "United States".to_string());

        cache.put("country_mappings", &mappings, None).unwrap();

        let back: Option<HashMap<String, String>> = cache.fetch("country_mappings");
        assert_eq!(back, Some(mappings));
    }

    #[test]
    fn test_fetch_wrong_shape_is_an_honest_miss() {
        let cache = cache();
        cache.set("country_mappings", json!("garbage"), None);

        let mappings: Option<HashMap<String, String>> = cache.fetch("country_mappings");
        assert_eq!(mappings, None);

        let stats = cache.get_stats();
        assert_eq!((stats.hits, stats.misses), (0, 1));
        assert!(cache.get_keys().is_empty(), "Mismatched entry is dropped");
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn test_put_reports_failed_write() {
        let cache = cache();
        cache.set("k", json!("previous"), None);

        let result = cache.put("k", &Unserializable, None);

        assert!(matches!(result, Err(CacheError::Serialization(_))));
        assert_eq!(cache.get("k"), Some(json!("previous")));
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let cache = cache();
        cache.set("k", json!(1), None);

        let poisoner = cache.clone();
        let _ = thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the cache lock");
        })
        .join();

        assert!(cache.inner.is_poisoned());
        assert_eq!(cache.get("k"), Some(json!(1)));
        cache.clear();
        assert!(cache.get_keys().is_empty());
    }

    #[test]
    fn test_concurrent_sets_then_gets() {
        const N: usize = 64;
        let cache = cache();

        thread::scope(|scope| {
            for i in 0..N {
                let cache = &cache;
                scope.spawn(move || cache.set(format!("key:{}", i), json!(i), None));
            }
        });

        let results: Vec<Option<Value>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..N)
                .map(|i| {
                    let cache = &cache;
                    scope.spawn(move || cache.get(&format!("key:{}", i)))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (i, value) in results.into_iter().enumerate() {
            assert_eq!(value, Some(json!(i)));
        }
        let stats = cache.get_stats();
        assert_eq!(stats.hits, N as u64);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.size, N);
    }

    #[test]
    fn test_concurrent_mixed_gets_account_every_call() {
        const THREADS: usize = 8;
        const CALLS: usize = 250;
        let cache = cache();
        cache.set("present", json!(true), None);

        thread::scope(|scope| {
            for t in 0..THREADS {
                let cache = &cache;
                scope.spawn(move || {
                    for i in 0..CALLS {
                        if (t + i) % 2 == 0 {
                            cache.get("present");
                        } else {
                            cache.get("absent");
                        }
                    }
                });
            }
        });

        let stats = cache.get_stats();
        assert_eq!(stats.requests(), (THREADS * CALLS) as u64);
        assert_eq!(stats.hits, stats.misses);
    }
}
