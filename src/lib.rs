//! Quadboard - Campus Forum Backend
//!
//! A campus forum service: users authenticate through WeChat's code
//! exchange, then create posts organized into regions, attach up to nine
//! images per post, comment two levels deep, and vote.
//!
//! # Architecture
//!
//! Data is split across two stores. The relational store (PostgreSQL via
//! sqlx) holds index rows: identifiers, parent links, counters and the
//! soft-delete flag. The content store holds the documents those rows
//! reference: post/comment bodies and the image slot array. Reads join the
//! two by `content_ref`; writes run content-first with best-effort cleanup
//! (see `posts::db`). Image bytes live in a third place, the blob bucket.
//!
//! # Module Structure
//!
//! - **`server`** - configuration, application state, app creation
//! - **`routes`** - router assembly
//! - **`middleware`** - JWT verification and user extractors
//! - **`error`** - error taxonomy and response conversion
//! - **`auth`** - WeChat exchange, sessions, users, permissions
//! - **`content`** - content-store and blob-bucket ports and adapters
//! - **`posts`** / **`comments`** / **`votes`** / **`regions`** / **`stats`**
//!   - the forum surface itself
//! - **`util`** - pagination and the image slot mask

/// WeChat login, JWT sessions, users and permissions
pub mod auth;

/// Comment CRUD and tree reconstruction
pub mod comments;

/// Content-store and blob-bucket ports
pub mod content;

/// Error taxonomy
pub mod error;

/// Request middleware
pub mod middleware;

/// Post CRUD, aggregation and images
pub mod posts;

/// Region management
pub mod regions;

/// Route configuration
pub mod routes;

/// Server setup and state
pub mod server;

/// Per-user statistics
pub mod stats;

/// Pagination and mask utilities
pub mod util;

/// Vote add/remove
pub mod votes;

pub use error::ApiError;
pub use server::{create_app, AppState, ServerConfig};
