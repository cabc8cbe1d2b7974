/**
 * Vote Database Operations
 *
 * The insert relies on the (user_id, post_id) primary key to resolve
 * concurrent duplicates: `ON CONFLICT DO NOTHING` makes the losing insert
 * report zero affected rows, and only the winner increments the post's
 * counter. Two simultaneous votes from one user therefore converge to one
 * stored row and exactly one increment, with the loser observing success.
 *
 * Removal mirrors this: the counter moves only when a row was actually
 * deleted.
 */

use chrono::Utc;
use sqlx::PgPool;

use crate::error::ApiError;

/// Record a vote. Returns whether the vote was newly stored; `false`
/// means the user had already voted and nothing changed.
pub async fn add_vote(pool: &PgPool, user_id: i32, post_id: i32) -> Result<bool, ApiError> {
    let result = sqlx::query(
        r#"
        INSERT INTO votes (user_id, post_id, created_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, post_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query("UPDATE posts SET vote_count = vote_count + 1, updated_at = $2 WHERE id = $1")
        .bind(post_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    Ok(true)
}

/// Withdraw a vote. Returns whether a vote was actually removed.
pub async fn remove_vote(pool: &PgPool, user_id: i32, post_id: i32) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM votes WHERE user_id = $1 AND post_id = $2")
        .bind(user_id)
        .bind(post_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query("UPDATE posts SET vote_count = vote_count - 1, updated_at = $2 WHERE id = $1")
        .bind(post_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    Ok(true)
}
