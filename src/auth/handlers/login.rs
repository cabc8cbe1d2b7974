/**
 * Login Handler
 *
 * The single unauthenticated endpoint. `POST /auth`:
 *
 * 1. Exchange the WeChat code with the provider
 * 2. Upsert the user by openid (first login creates the row)
 * 3. Issue a JWT carrying the user id, admin flag and WeChat session
 *
 * An invalid code is the client's problem (400); an unreachable provider
 * is not (502). Both paths are decided inside the WeChat client.
 */

use axum::{extract::State, Json};

use crate::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::auth::sessions::create_token;
use crate::auth::users::find_or_create_by_wechat_id;
use crate::error::ApiError;
use crate::server::state::AppState;

/// POST /auth
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let session = state.wechat.exchange_code(&request.code).await?;

    let user = find_or_create_by_wechat_id(&state.pool, &session.open_id)
        .await
        .map_err(|e| {
            tracing::error!("user upsert failed for openid {}: {e}", session.open_id);
            ApiError::Store(e)
        })?;

    let token = create_token(
        &state.config.jwt_secret,
        user.id,
        user.is_admin,
        session,
    )?;

    tracing::info!("user {} logged in", user.id);

    Ok(Json(AuthResponse {
        user: UserResponse::from(&user),
        token,
    }))
}
