//! Votes Module
//!
//! One vote per (user, post), enforced by the table's primary key rather
//! than a check-then-insert. Both add and remove converge: repeating
//! either is a success-as-no-op.

/// Vote inserts/deletes and counter maintenance
pub mod db;

/// HTTP handlers
pub mod handlers;
