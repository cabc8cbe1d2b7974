/**
 * Vote Handlers
 *
 * Both endpoints return 200 regardless of whether anything changed:
 * voting twice and un-voting a post never voted for are no-ops, not
 * errors. The post itself must exist and be live.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::posts::db::find_live_post;
use crate::server::state::AppState;
use crate::votes::db;

/// POST /posts/{id}/votes
pub async fn add_vote(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    find_live_post(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("post"))?;

    db::add_vote(&state.pool, user.user_id, id).await?;
    Ok(StatusCode::OK)
}

/// DELETE /posts/{id}/votes
pub async fn remove_vote(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    find_live_post(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("post"))?;

    db::remove_vote(&state.pool, user.user_id, id).await?;
    Ok(StatusCode::OK)
}
