//! Comments Module
//!
//! Comments are two levels deep by construction: a root comment hangs off
//! a post, a reply hangs off a root comment, and nothing hangs off a
//! reply. The index rows store the flat form (one nullable parent column
//! per kind, exactly one set); `tree` rebuilds the nested form the API
//! returns.

/// Comment queries and the dual-store write paths
pub mod db;

/// HTTP handlers
pub mod handlers;

/// Flat-to-tree reconstruction
pub mod tree;

pub use db::{CommentParent, CommentRecord};
pub use tree::{build_comment_tree, CommentNode, FlatComment, ReplyNode};
