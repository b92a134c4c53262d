//! Cache Statistics Module
//!
//! Tracks cache hit/miss accounting and builds the stats snapshot.

use serde::Serialize;

// == Cache Stats ==
/// Cache performance metrics.
///
/// The store keeps one instance as its running counters; `size`,
/// `expired_count` and `hit_rate` are only meaningful on a snapshot
/// produced by [`CacheStats::snapshot`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Entries currently held, including expired ones not yet swept
    pub size: usize,
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// hits / (hits + misses), 0 when no request was made
    pub hit_rate: f64,
    /// Entries logically expired but still held
    pub expired_count: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total number of `get` calls accounted for.
    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Turns the last recorded hit into a miss, for a hit whose value
    /// turned out to be unusable.
    pub fn demote_hit(&mut self) {
        if self.hits > 0 {
            self.hits -= 1;
            self.misses += 1;
        }
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // == Snapshot ==
    /// Copies the counters into a snapshot with the derived fields filled in.
    pub fn snapshot(&self, size: usize, expired_count: usize) -> Self {
        Self {
            size,
            hits: self.hits,
            misses: self.misses,
            hit_rate: self.hit_rate(),
            expired_count,
        }
    }
}
