//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

use serde_json::Value;

use crate::cache::MAX_TTL;

// == Cache Entry ==
/// Represents a single cache entry with its payload and expiration.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored JSON document
    pub value: Value,
    /// Instant after which the entry is considered absent
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` after `now`.
    ///
    /// TTLs above [`MAX_TTL`] are clamped.
    pub fn new(value: Value, ttl: Duration, now: Instant) -> Self {
        let ttl = ttl.min(MAX_TTL);
        let expires_at = now.checked_add(ttl).unwrap_or(now);

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is still live at exactly `expires_at`
    /// and expired strictly after it.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}
