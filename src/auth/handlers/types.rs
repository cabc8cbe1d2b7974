/**
 * Authentication Handler Types
 *
 * Wire types for `POST /auth`. There is no password anywhere: the only
 * credential is the WeChat login code.
 */

use serde::{Deserialize, Serialize};

use crate::auth::users::User;

/// Login request: the code produced by the WeChat client SDK.
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub code: String,
}

/// Auth response: the JWT to present in the `Jwt` header plus a summary
/// of the logged-in user.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// User summary (no openid, no provider material).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: Option<String>,
    /// First login, profile not yet filled in.
    pub is_fresh: bool,
    pub is_admin: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_fresh: user.is_fresh(),
            is_admin: user.is_admin,
        }
    }
}
