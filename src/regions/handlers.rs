/**
 * Region Handlers
 *
 * Creation and deletion require the admin claim; the icon upload accepts
 * at most one multipart file of at most 100 KiB.
 */

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ApiError;
use crate::middleware::auth::AdminUser;
use crate::regions::db::{self, Region};
use crate::server::state::AppState;

/// Icon size cap: 100 KiB.
const ICON_SIZE_LIMIT: usize = 100 * 1024;

/// GET /regions
pub async fn list_regions(State(state): State<AppState>) -> Result<Json<Vec<Region>>, ApiError> {
    Ok(Json(db::list_regions(&state.pool).await?))
}

/// POST /regions/{name} (admin)
pub async fn create_region(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(name): Path<String>,
    mut multipart: Multipart,
) -> Result<StatusCode, ApiError> {
    let mut icon: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_input(format!("bad multipart body: {e}")))?
    {
        if icon.is_some() {
            return Err(ApiError::invalid_input("more than one icon file"));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::invalid_input(format!("bad multipart body: {e}")))?;
        if data.len() > ICON_SIZE_LIMIT {
            return Err(ApiError::invalid_input("icon larger than 100 KiB"));
        }
        icon = Some(data.to_vec());
    }

    let id = db::create_region(&state.pool, &name, icon).await?;
    tracing::info!("admin {} created region {id} ({name})", user.user_id);
    Ok(StatusCode::OK)
}

/// GET /regions/{id}/icon
///
/// Always served as image/jpeg; a region without an icon yields an empty
/// body rather than an error.
pub async fn get_icon(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let icon = db::region_icon(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("region"))?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "image/jpeg")
        .body(Body::from(icon.unwrap_or_default()))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()))
}

/// DELETE /regions/{id} (admin)
pub async fn delete_region(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    db::delete_region(&state.pool, id).await?;
    tracing::info!("admin {} deleted region {id}", user.user_id);
    Ok(StatusCode::OK)
}
