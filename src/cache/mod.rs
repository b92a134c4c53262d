//! Cache Module
//!
//! Provides the in-memory, TTL-expiring query cache shared by every endpoint.

mod entry;
mod shared;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use entry::CacheEntry;
pub use shared::TtlCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes for keys set over HTTP
pub const MAX_KEY_LENGTH: usize = 256;

/// Longest lifetime an entry can be given; longer TTLs are clamped
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 86_400);
