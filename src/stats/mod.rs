//! Statistics Module
//!
//! Per-user aggregates over the live posts they authored.

/// HTTP handler and query
pub mod handlers;

pub use handlers::UserStats;
