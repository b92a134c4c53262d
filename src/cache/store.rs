//! Cache Store Module
//!
//! Unsynchronized cache engine: HashMap storage, lazy TTL expiration and
//! hit/miss accounting. [`TtlCache`](crate::cache::TtlCache) wraps it in a lock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Expiring key/value storage.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage; may hold expired entries until read or swept
    entries: HashMap<String, CacheEntry>,
    /// Hit/miss counters since the last clear
    stats: CacheStats,
    /// TTL applied when a caller does not give one
    default_ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with the given default TTL.
    ///
    /// Fails with [`CacheError::InvalidTtl`] when `default_ttl` is zero.
    pub fn new(default_ttl: Duration) -> Result<Self> {
        if default_ttl.is_zero() {
            return Err(CacheError::InvalidTtl(
                "default TTL must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
        })
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry and resetting its TTL.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The JSON document to store
    /// * `ttl` - Optional TTL (uses the default TTL if None)
    pub fn set(&mut self, key: String, value: Value, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, ttl, Instant::now());
        self.entries.insert(key, entry);
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let now = Instant::now();

        match self.entries.get(key) {
            Some(entry) if entry.is_expired_at(now) => {
                self.entries.remove(key);
                self.stats.record_miss();
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drops an entry just returned by `get` whose value the caller could
    /// not use, and re-counts that lookup as a miss.
    pub fn discard_hit(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.stats.demote_hit();
        }
    }

    // == Clear ==
    /// Drops every entry and zeroes the hit/miss counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.reset();
    }

    // == Cleanup Expired ==
    /// Removes all entries expired at call time.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    // == Stats ==
    /// Returns a statistics snapshot.
    ///
    /// `size` counts expired entries that have not been removed yet.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let expired = self
            .entries
            .values()
            .filter(|entry| entry.is_expired_at(now))
            .count();
        self.stats.snapshot(self.entries.len(), expired)
    }

    // == Keys ==
    /// Returns every stored key, expired-but-unswept ones included.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
