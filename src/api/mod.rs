//! API Module
//!
//! HTTP handlers and routing. The cache itself is never exposed beyond
//! these handlers; route-level caching uses composite, colon-delimited keys.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
