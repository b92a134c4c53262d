//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries so keys
//! nobody reads again do not hold memory forever.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::cache::TtlCache;
use crate::config::Config;

/// Timing of the sweep loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupSchedule {
    /// Delay after a successful sweep
    pub interval: Duration,
    /// Delay after a failed sweep
    pub retry_interval: Duration,
}

impl CleanupSchedule {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: Duration::from_secs(config.cleanup_interval),
            retry_interval: Duration::from_secs(config.cleanup_retry_interval),
        }
    }
}

impl Default for CleanupSchedule {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
            retry_interval: Duration::from_secs(300),
        }
    }
}

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// Each cycle sweeps first and then sleeps. A cycle whose sweep fails is
/// logged and followed by the shorter retry delay; the loop itself never
/// stops until the returned handle is aborted.
///
/// # Example
/// ```ignore
/// let cache = TtlCache::new(Duration::from_secs(300))?;
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), CleanupSchedule::default());
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: TtlCache, schedule: CleanupSchedule) -> JoinHandle<()> {
    spawn_sweeper(move || cache.cleanup_expired(), schedule)
}

fn spawn_sweeper<F>(sweep: F, schedule: CleanupSchedule) -> JoinHandle<()>
where
    F: Fn() -> usize + Send + Sync + 'static,
{
    let sweep = Arc::new(sweep);

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task: interval={:?}, retry_interval={:?}",
            schedule.interval, schedule.retry_interval
        );

        loop {
            // Run the sweep as its own task so a panic surfaces as a JoinError
            let cycle = Arc::clone(&sweep);
            let delay = match tokio::spawn(async move { (*cycle)() }).await {
                Ok(removed) if removed > 0 => {
                    info!("TTL cleanup: removed {} expired entries", removed);
                    schedule.interval
                }
                Ok(_) => {
                    debug!("TTL cleanup: no expired entries found");
                    schedule.interval
                }
                Err(err) => {
                    error!(
                        "TTL cleanup failed, retrying in {:?}: {}",
                        schedule.retry_interval, err
                    );
                    schedule.retry_interval
                }
            };

            tokio::time::sleep(delay).await;
        }
    })
}
