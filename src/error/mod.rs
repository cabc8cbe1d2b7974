//! Error Module
//!
//! Defines the error taxonomy used by handlers and data access code.
//! Every variant maps to a client-facing HTTP status; the conversion to an
//! actual response lives in `conversion`.
//!
//! # Error Types
//!
//! - `NotFound` - target entity absent or soft-deleted
//! - `Forbidden` - authenticated but not authorized
//! - `InvalidInput` - malformed mask, out-of-range pagination, bad fields
//! - `Conflict` - unique-constraint rejection surfaced to the caller
//! - `Upstream` - identity provider or store connectivity failure
//! - `Store` - unexpected database errors (logged, surfaced as 500)

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::{is_foreign_key_violation, is_unique_violation, ApiError};
