/**
 * Post Handlers
 *
 * HTTP surface for posts and their images. Authorization follows one
 * shape: resolve the live target's author (absent → 404), then apply the
 * owner-or-admin predicate (mismatch → 403). Admins skip the author
 * lookup; the operation itself still reports a missing post.
 *
 * For the image endpoints the mask is validated before authorization, so
 * a syntactically bad request is rejected as such even when the caller
 * could not have touched the post.
 */

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::permissions::ensure_can_edit;
use crate::error::ApiError;
use crate::middleware::auth::{AuthUser, AuthenticatedUser};
use crate::posts::db;
use crate::posts::types::{
    CreatePostRequest, CreatePostResponse, ListPostsQuery, PatchPostRequest, PostInfo,
    PostListItem,
};
use crate::server::state::AppState;
use crate::util::image_mask;

/// Resolve edit ability for a post. Admins pass without the author lookup.
async fn check_post_edit(
    pool: &sqlx::PgPool,
    actor: &AuthenticatedUser,
    post_id: i32,
) -> Result<(), ApiError> {
    if actor.is_admin {
        return Ok(());
    }
    let author = db::post_author_id(pool, post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("post"))?;
    ensure_can_edit(actor, author)
}

/// GET /posts?region=&page=&itemsPerPage=
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<Vec<PostListItem>>, ApiError> {
    let page = query.page.unwrap_or(0);
    let items_per_page = query.items_per_page.unwrap_or(i32::MAX);

    let pairs = db::list_posts(
        &state.pool,
        state.content.as_ref(),
        query.region,
        page,
        items_per_page,
    )
    .await?;

    Ok(Json(
        pairs
            .iter()
            .map(|(index, content)| PostListItem::new(index, content.as_ref()))
            .collect(),
    ))
}

/// GET /posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PostInfo>, ApiError> {
    let (index, content) = db::find_post(&state.pool, state.content.as_ref(), id).await?;
    Ok(Json(PostInfo::new(&index, &content)))
}

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreatePostRequest>,
) -> Result<Json<CreatePostResponse>, ApiError> {
    let id = db::create_post(
        &state.pool,
        state.content.as_ref(),
        user.user_id,
        request.region_id,
        &request.title,
        &request.text,
    )
    .await?;

    tracing::info!("user {} created post {id}", user.user_id);
    Ok(Json(CreatePostResponse { id }))
}

/// PUT /posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Json(patch): Json<PatchPostRequest>,
) -> Result<StatusCode, ApiError> {
    check_post_edit(&state.pool, &user, id).await?;

    if patch.is_empty() {
        return Ok(StatusCode::OK);
    }

    db::update_post(
        &state.pool,
        state.content.as_ref(),
        id,
        patch.title.as_deref(),
        patch.text.as_deref(),
    )
    .await?;
    Ok(StatusCode::OK)
}

/// DELETE /posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    check_post_edit(&state.pool, &user, id).await?;
    db::remove_post(&state.pool, id).await?;

    tracing::info!("post {id} removed by user {}", user.user_id);
    Ok(StatusCode::OK)
}

/// POST /posts/{id}/images/{mask}
///
/// Multipart files in mask order: the Nth file goes to the slot named by
/// the Nth mask digit.
pub async fn upload_images(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, mask)): Path<(i32, String)>,
    mut multipart: Multipart,
) -> Result<StatusCode, ApiError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_input(format!("bad multipart body: {e}")))?
    {
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::invalid_input(format!("bad multipart body: {e}")))?;
        files.push(data.to_vec());
    }

    let assignments = image_mask::zip_with_files(&mask, files)?;

    check_post_edit(&state.pool, &user, id).await?;
    db::update_post_images(&state.pool, state.content.as_ref(), &state.blobs, id, assignments)
        .await?;
    Ok(StatusCode::OK)
}

/// DELETE /posts/{id}/images/{mask}
pub async fn remove_images(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, mask)): Path<(i32, String)>,
) -> Result<StatusCode, ApiError> {
    let slots = image_mask::extract_slots(&mask)?;

    check_post_edit(&state.pool, &user, id).await?;
    db::remove_post_images(&state.pool, state.content.as_ref(), &state.blobs, id, &slots)
        .await?;
    Ok(StatusCode::OK)
}

/// GET /posts/{id}/images/{slot}
pub async fn get_image(
    State(state): State<AppState>,
    Path((id, slot)): Path<(i32, String)>,
) -> Result<Response, ApiError> {
    let slot: usize = slot
        .parse()
        .map_err(|_| ApiError::invalid_input("slot must be a number"))?;

    let blob_id = db::find_post_image(&state.pool, state.content.as_ref(), id, slot)
        .await?
        .ok_or_else(|| ApiError::not_found("image"))?;

    let data = state
        .blobs
        .download(blob_id)
        .await?
        .ok_or_else(|| ApiError::not_found("image"))?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "image/jpeg")
        .body(Body::from(data))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()))
}
