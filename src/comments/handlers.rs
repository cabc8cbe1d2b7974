/**
 * Comment Handlers
 *
 * Listing returns the reconstructed two-level tree. Creation distinguishes
 * roots from replies by the optional `parentId` query parameter. Deletion
 * is author-or-admin, resolved against the comment's author.
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::auth::permissions::ensure_can_edit;
use crate::comments::db;
use crate::comments::tree::{build_comment_tree, CommentNode};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::server::state::AppState;

/// Query string of `POST /posts/{id}/comments`.
#[derive(Debug, Deserialize)]
pub struct AddCommentQuery {
    #[serde(rename = "parentId")]
    pub parent_id: Option<i32>,
}

/// Body of `POST /posts/{id}/comments`.
#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub text: String,
}

/// GET /posts/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<CommentNode>>, ApiError> {
    let flat = db::find_post_comments(&state.pool, state.content.as_ref(), id).await?;
    Ok(Json(build_comment_tree(&flat)))
}

/// POST /posts/{id}/comments?parentId=
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Query(query): Query<AddCommentQuery>,
    Json(request): Json<AddCommentRequest>,
) -> Result<StatusCode, ApiError> {
    db::add_comment(
        &state.pool,
        state.content.as_ref(),
        user.user_id,
        id,
        query.parent_id,
        &request.text,
    )
    .await?;
    Ok(StatusCode::OK)
}

/// DELETE /posts/{id}/comments/{comment_id}
pub async fn remove_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, comment_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    if !user.is_admin {
        let author = db::comment_author_id(&state.pool, comment_id)
            .await?
            .ok_or_else(|| ApiError::not_found("comment"))?;
        ensure_can_edit(&user, author)?;
    }

    db::remove_comment(&state.pool, id, comment_id).await?;
    Ok(StatusCode::OK)
}
