/**
 * Region Database Operations
 *
 * Icons are small (capped at 100 KiB by the handler) and live inline in
 * the row; the listing never selects the icon column.
 */

use sqlx::PgPool;

use crate::error::{is_unique_violation, ApiError};

/// Region row without the icon payload.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Region {
    pub id: i32,
    pub title: String,
}

/// All regions.
pub async fn list_regions(pool: &PgPool) -> Result<Vec<Region>, ApiError> {
    let regions = sqlx::query_as::<_, Region>("SELECT id, title FROM regions ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(regions)
}

/// Create a region. A duplicate title is a client-facing conflict, not a
/// no-op — unlike votes, the caller is told the name is taken.
pub async fn create_region(
    pool: &PgPool,
    title: &str,
    icon: Option<Vec<u8>>,
) -> Result<i32, ApiError> {
    let inserted: Result<i32, sqlx::Error> =
        sqlx::query_scalar("INSERT INTO regions (title, icon) VALUES ($1, $2) RETURNING id")
            .bind(title)
            .bind(icon)
            .fetch_one(pool)
            .await;

    match inserted {
        Ok(id) => Ok(id),
        Err(err) if is_unique_violation(&err) => {
            Err(ApiError::conflict("region title already exists"))
        }
        Err(err) => Err(err.into()),
    }
}

/// Icon bytes for a region. Outer `None`: no such region; inner `None`:
/// region exists but has no icon.
pub async fn region_icon(pool: &PgPool, id: i32) -> Result<Option<Option<Vec<u8>>>, ApiError> {
    let row: Option<Option<Vec<u8>>> =
        sqlx::query_scalar("SELECT icon FROM regions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

/// Delete a region. Regions are hard-deleted; posts keep them alive via
/// the foreign key, which surfaces as a store error the admin can act on.
pub async fn delete_region(pool: &PgPool, id: i32) -> Result<(), ApiError> {
    let result = sqlx::query("DELETE FROM regions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("region"));
    }
    Ok(())
}
