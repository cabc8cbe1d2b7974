/**
 * Authentication Middleware
 *
 * Protects every route except `POST /auth`. The client presents the JWT
 * issued at login in the `Jwt` request header (no Bearer prefix); the
 * middleware verifies it and attaches the decoded identity to the request
 * extensions for handlers to extract.
 */

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::auth::sessions::verify_token;
use crate::server::state::AppState;

/// Header carrying the session token.
const JWT_HEADER: &str = "Jwt";

/// Authenticated identity decoded from the JWT.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub is_admin: bool,
}

/// Authentication middleware
///
/// 1. Reads the `Jwt` header
/// 2. Verifies the token against the configured secret
/// 3. Attaches [`AuthenticatedUser`] to the request extensions
///
/// Returns 401 Unauthorized if the header is missing or the token does
/// not verify.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = request
        .headers()
        .get(JWT_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("missing Jwt header");
            StatusCode::UNAUTHORIZED
        })?;

    let claims = verify_token(&app_state.config.jwt_secret, token).map_err(|e| {
        tracing::warn!("token rejected: {e}");
        StatusCode::UNAUTHORIZED
    })?;

    let user_id = claims.user_id().map_err(|e| {
        tracing::warn!("token carried malformed user id: {e}");
        StatusCode::UNAUTHORIZED
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        is_admin: claims.is_admin,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                StatusCode::UNAUTHORIZED
            })
    }
}

/// Extractor that additionally requires the admin claim.
///
/// Used by the region management endpoints. Non-admins get 403.
#[derive(Clone, Debug)]
pub struct AdminUser(pub AuthenticatedUser);

impl axum::extract::FromRequestParts<AppState> for AdminUser {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(StatusCode::FORBIDDEN);
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    fn state() -> AppState {
        AppState::for_tests()
    }

    #[tokio::test]
    async fn test_extract_authenticated_user() {
        let (mut parts, _) = Request::builder()
            .uri("http://example.com")
            .body(())
            .unwrap()
            .into_parts();
        parts.extensions.insert(AuthenticatedUser {
            user_id: 42,
            is_admin: false,
        });

        let AuthUser(user) = AuthUser::from_request_parts(&mut parts, &state())
            .await
            .unwrap();
        assert_eq!(user.user_id, 42);
    }

    #[tokio::test]
    async fn test_extract_missing_user() {
        let (mut parts, _) = Request::builder()
            .uri("http://example.com")
            .body(())
            .unwrap()
            .into_parts();

        let rejection = AuthUser::from_request_parts(&mut parts, &state())
            .await
            .unwrap_err();
        assert_eq!(rejection, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_extractor_rejects_non_admin() {
        let (mut parts, _) = Request::builder()
            .uri("http://example.com")
            .body(())
            .unwrap()
            .into_parts();
        parts.extensions.insert(AuthenticatedUser {
            user_id: 42,
            is_admin: false,
        });

        let rejection = AdminUser::from_request_parts(&mut parts, &state())
            .await
            .unwrap_err();
        assert_eq!(rejection, StatusCode::FORBIDDEN);
    }
}
