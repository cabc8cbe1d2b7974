/**
 * User Statistics
 *
 * `GET /stat` reports how many live posts the calling user has authored
 * and the votes they have collected. The aggregation is pushed into SQL;
 * removed posts count for nothing.
 */

use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::server::state::AppState;

/// Reply of `GET /stat`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub user_id: i32,
    pub number_of_posts: i64,
    pub number_of_votes: i64,
}

async fn user_stats(pool: &PgPool, user_id: i32) -> Result<UserStats, ApiError> {
    let (number_of_posts, number_of_votes): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COALESCE(SUM(vote_count), 0)::BIGINT
        FROM posts
        WHERE author_id = $1 AND is_removed = FALSE
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(UserStats {
        user_id,
        number_of_posts,
        number_of_votes,
    })
}

/// GET /stat
pub async fn get_stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserStats>, ApiError> {
    Ok(Json(user_stats(&state.pool, user.user_id).await?))
}
