/**
 * Comment Database Operations
 *
 * Comment index rows mirror the post layout: identifiers and parent links
 * in the relational store, body text in the content store. Creation is the
 * same content-first saga as posts, followed by the post's comment counter
 * and freshness bump.
 */

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::comments::tree::FlatComment;
use crate::content::{CommentContent, ContentStore};
use crate::error::ApiError;
use crate::posts::db::find_live_post;

/// Where a comment hangs: off a post (root) or off a root comment (reply).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentParent {
    Post(i32),
    Comment(i32),
}

/// Comment index row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: i32,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub content_ref: Uuid,
    pub post_id: Option<i32>,
    pub parent_id: Option<i32>,
    pub is_removed: bool,
}

impl CommentRecord {
    /// Decode the two nullable columns into the parent union.
    ///
    /// The schema's CHECK constraint makes both-set and neither-set
    /// unrepresentable; a row that violates it anyway is a store fault.
    pub fn parent(&self) -> Result<CommentParent, ApiError> {
        match (self.post_id, self.parent_id) {
            (Some(post_id), None) => Ok(CommentParent::Post(post_id)),
            (None, Some(parent_id)) => Ok(CommentParent::Comment(parent_id)),
            _ => Err(ApiError::content_store(format!(
                "comment {} has inconsistent parent columns",
                self.id
            ))),
        }
    }
}

const COMMENT_COLUMNS: &str =
    "id, author_id, created_at, content_ref, post_id, parent_id, is_removed";

/// All live comments belonging to one post, flattened and joined with
/// their content: roots attached to the post plus replies attached to
/// those roots, in id order (creation order).
///
/// A comment whose content document is missing gets empty text rather
/// than sinking the listing.
pub async fn find_post_comments(
    pool: &PgPool,
    store: &dyn ContentStore,
    post_id: i32,
) -> Result<Vec<FlatComment>, ApiError> {
    let records = sqlx::query_as::<_, CommentRecord>(&format!(
        r#"
        SELECT {COMMENT_COLUMNS}
        FROM comments
        WHERE is_removed = FALSE
          AND (post_id = $1
               OR parent_id IN (SELECT id FROM comments
                                WHERE post_id = $1 AND is_removed = FALSE))
        ORDER BY id
        "#
    ))
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    let refs: Vec<Uuid> = records.iter().map(|r| r.content_ref).collect();
    let contents = store.find_comment_contents(&refs).await?;
    let text_by_id: std::collections::HashMap<Uuid, String> =
        contents.into_iter().map(|c| (c.id, c.text)).collect();

    records
        .into_iter()
        .map(|record| {
            let parent = record.parent()?;
            Ok(FlatComment {
                id: record.id,
                author_id: record.author_id,
                creation_time: record.created_at,
                text: text_by_id
                    .get(&record.content_ref)
                    .cloned()
                    .unwrap_or_default(),
                parent,
            })
        })
        .collect()
}

/// Author of a live comment; `None` when absent or removed.
pub async fn comment_author_id(pool: &PgPool, id: i32) -> Result<Option<i32>, ApiError> {
    let author: Option<i32> =
        sqlx::query_scalar("SELECT author_id FROM comments WHERE id = $1 AND is_removed = FALSE")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(author)
}

/// Whether a live comment with this id exists (reply-parent check).
async fn live_comment_exists(pool: &PgPool, id: i32) -> Result<bool, ApiError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM comments WHERE id = $1 AND is_removed = FALSE)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Add a root comment or a reply.
///
/// The post must be live; a reply's parent must be a live comment. Content
/// document first, index row second, best-effort content cleanup when the
/// index write fails; then the post's comment counter and `updated_at` are
/// bumped.
pub async fn add_comment(
    pool: &PgPool,
    store: &dyn ContentStore,
    author_id: i32,
    post_id: i32,
    parent_id: Option<i32>,
    text: &str,
) -> Result<i32, ApiError> {
    find_live_post(pool, post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("post"))?;

    if let Some(parent_id) = parent_id {
        if !live_comment_exists(pool, parent_id).await? {
            return Err(ApiError::not_found("comment"));
        }
    }

    let content = CommentContent::create(text);
    store.insert_comment_content(&content).await?;

    // Root comments point at the post, replies at the parent comment.
    let (post_column, parent_column) = match parent_id {
        None => (Some(post_id), None),
        Some(parent) => (None, Some(parent)),
    };

    let inserted: Result<i32, sqlx::Error> = sqlx::query_scalar(
        r#"
        INSERT INTO comments (author_id, created_at, content_ref, post_id, parent_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(author_id)
    .bind(Utc::now())
    .bind(content.id)
    .bind(post_column)
    .bind(parent_column)
    .fetch_one(pool)
    .await;

    let id = match inserted {
        Ok(id) => id,
        Err(err) => {
            if let Err(cleanup) = store.delete_comment_content(content.id).await {
                tracing::warn!(
                    "orphaned comment content {} not cleaned up: {cleanup}",
                    content.id
                );
            }
            return Err(err.into());
        }
    };

    sqlx::query(
        "UPDATE posts SET comment_count = comment_count + 1, updated_at = $2 WHERE id = $1",
    )
    .bind(post_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(id)
}

/// Soft-delete a comment and decrement the post's counter.
pub async fn remove_comment(pool: &PgPool, post_id: i32, comment_id: i32) -> Result<(), ApiError> {
    find_live_post(pool, post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("post"))?;

    let result =
        sqlx::query("UPDATE comments SET is_removed = TRUE WHERE id = $1 AND is_removed = FALSE")
            .bind(comment_id)
            .execute(pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("comment"));
    }

    sqlx::query("UPDATE posts SET comment_count = comment_count - 1 WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(())
}
