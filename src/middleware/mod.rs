//! Request middleware: JWT verification and the authenticated-user
//! extractors handlers consume.

/// JWT authentication middleware
pub mod auth;

pub use auth::{auth_middleware, AdminUser, AuthUser, AuthenticatedUser};
