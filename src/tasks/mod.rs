//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Cleanup: Sweeps expired cache entries on a fixed interval

mod cleanup;

pub use cleanup::{spawn_cleanup_task, CleanupSchedule};
