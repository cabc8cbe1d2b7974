/**
 * Session Management and JWT Tokens
 *
 * Encodes the authenticated identity into an HS256 JWT presented in the
 * `Jwt` request header. Besides the user id and admin flag, the claims
 * carry the WeChat session so later requests can talk to the provider on
 * the user's behalf without a server-side session table.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::wechat::WechatSession;
use crate::error::ApiError;

/// Token lifetime: 30 days.
const TOKEN_LIFETIME_SECS: u64 = 30 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Whether the user holds admin rights
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    /// WeChat session bound to this login
    pub wechat: WechatSession,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

impl Claims {
    /// Numeric user id carried in `sub`.
    pub fn user_id(&self) -> Result<i32, ApiError> {
        self.sub
            .parse()
            .map_err(|_| ApiError::forbidden("malformed user id in token"))
    }
}

/// Create a JWT for a freshly authenticated user.
pub fn create_token(
    secret: &str,
    user_id: i32,
    is_admin: bool,
    wechat: WechatSession,
) -> Result<String, ApiError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs();

    let claims = Claims {
        sub: user_id.to_string(),
        is_admin,
        wechat,
        exp: now + TOKEN_LIFETIME_SECS,
        iat: now,
    };

    let key = EncodingKey::from_secret(secret.as_ref());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| ApiError::content_store(format!("token encoding failed: {e}")))
}

/// Verify and decode a JWT.
///
/// Tampered, expired or otherwise undecodable tokens all map to the same
/// rejection; callers turn it into a 401.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    let key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| ApiError::forbidden("invalid token"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    const SECRET: &str = "test-secret";

    fn wechat_session() -> WechatSession {
        WechatSession {
            open_id: "OPENID".into(),
            union_id: None,
            access_token: "ACCESS".into(),
            refresh_token: "REFRESH".into(),
            expires_at: Utc::now() + Duration::hours(2),
            scopes: vec!["snsapi_login".into()],
        }
    }

    #[test]
    fn test_roundtrip() {
        let token = create_token(SECRET, 42, false, wechat_session()).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();

        assert_eq!(claims.user_id().unwrap(), 42);
        assert!(!claims.is_admin);
        assert_eq!(claims.wechat.open_id, "OPENID");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_admin_flag_survives() {
        let token = create_token(SECRET, 1, true, wechat_session()).unwrap();
        assert!(verify_token(SECRET, &token).unwrap().is_admin);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token(SECRET, "invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(SECRET, 42, false, wechat_session()).unwrap();
        assert!(verify_token("other-secret", &token).is_err());
    }
}
