//! Posts Module
//!
//! Post indices live in the relational store; bodies and image slot arrays
//! live in the content store, joined by `content_ref`. Listing aggregates
//! a relational page with a batched content lookup; writes run the
//! content-first saga described in `db`.

/// Post index queries and the dual-store write paths
pub mod db;

/// HTTP handlers
pub mod handlers;

/// Wire types
pub mod types;

pub use db::PostIndex;
pub use types::{PostInfo, PostListItem};
