/**
 * User Rows and Database Operations
 *
 * Users exist as soon as they first log in through WeChat; there is no
 * registration flow. The upsert races with itself when the same openid
 * logs in from two devices at once, which the unique index on `wechat_id`
 * resolves: the losing insert simply re-reads the winner's row.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User row in the relational store.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    /// WeChat openid (unique).
    pub wechat_id: String,
    /// Display name; unset until the user picks one.
    pub username: Option<String>,
    /// Profile gender; unset until the user fills in their profile.
    pub gender: Option<bool>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// A user that has logged in but never completed their profile.
    pub fn is_fresh(&self) -> bool {
        self.gender.is_none()
    }
}

const USER_COLUMNS: &str = "id, wechat_id, username, gender, is_admin, created_at";

/// Find the user for a WeChat openid, creating the row on first login.
///
/// Optimistic insert: `ON CONFLICT DO NOTHING` plus a re-read covers the
/// two-devices-at-once race without a preceding existence check.
pub async fn find_or_create_by_wechat_id(
    pool: &PgPool,
    wechat_id: &str,
) -> Result<User, sqlx::Error> {
    let inserted = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (wechat_id)
        VALUES ($1)
        ON CONFLICT (wechat_id) DO NOTHING
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(wechat_id)
    .fetch_optional(pool)
    .await?;

    if let Some(user) = inserted {
        return Ok(user);
    }

    // The row already existed (or a concurrent login just created it).
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE wechat_id = $1"
    ))
    .bind(wechat_id)
    .fetch_one(pool)
    .await
}

/// Get user by ID
pub async fn get_user_by_id(pool: &PgPool, id: i32) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}
