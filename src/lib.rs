//! Tariff Cache - trade and tariff statistics service core
//!
//! An expiring in-process query cache with a periodic sweeper, load-once
//! reference tables and the HTTP surface that administers them.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod reference;
pub mod tasks;

pub use api::AppState;
pub use cache::TtlCache;
pub use config::Config;
pub use tasks::{spawn_cleanup_task, CleanupSchedule};
