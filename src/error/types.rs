/**
 * API Error Types
 *
 * This module defines the error enum shared by all handlers and data access
 * code. Validation problems become client-facing rejections; unexpected
 * store or provider failures are logged where they occur and surface as
 * generic server errors.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// The primary error type for all forum operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Target entity absent or soft-deleted.
    #[error("{0} not found")]
    NotFound(String),

    /// Authenticated but not authorized for the target entity.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Malformed request data (bad mask, bad pagination, missing field).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unique-constraint rejection that the caller should see as such
    /// (e.g. duplicate region title). Duplicate votes never reach this
    /// variant; they are treated as no-op successes at the call site.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Identity provider or store connectivity failure.
    #[error("upstream unavailable: {0}")]
    Upstream(String),

    /// Unexpected relational store failure.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Unexpected document/blob store failure.
    #[error("content store error: {0}")]
    ContentStore(String),
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    pub fn content_store(message: impl Into<String>) -> Self {
        Self::ContentStore(message.into())
    }

    /// HTTP status for this error.
    ///
    /// `Store` and `ContentStore` deliberately collapse to 500: the caller
    /// gets no detail about internal failures beyond the status.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::ContentStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to include in the response body.
    pub fn client_message(&self) -> String {
        match self {
            Self::Store(_) | Self::ContentStore(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Whether a sqlx error is a PostgreSQL unique-constraint violation.
///
/// Vote insertion and user upsert treat this as an expected terminal state
/// rather than an error.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

/// Whether a sqlx error is a PostgreSQL foreign-key violation, e.g. a post
/// created against a region that does not exist.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23503"),
        _ => false,
    }
}
