//! Authentication handlers.

/// POST /auth
pub mod login;

/// Request and response types
pub mod types;

pub use login::login;
pub use types::{AuthResponse, LoginRequest, UserResponse};
