/**
 * Post Database Operations
 *
 * The relational side holds the index rows; the content store holds the
 * documents. Writes that touch both stores are sagas: content first, then
 * index, with a best-effort delete of the orphaned content document when
 * the index write fails. There is no transactional guarantee across the
 * stores — a crash between the steps can leak a content document, never a
 * dangling index row.
 *
 * Every read helper here applies the `is_removed = FALSE` filter; handlers
 * never re-state the predicate.
 */

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use sqlx::PgPool;
use uuid::Uuid;

use crate::content::{
    apply_image_slots, clear_image_slots, BlobBucket, ContentStore, PostContent,
};
use crate::error::{is_foreign_key_violation, ApiError};
use crate::util::pagination::paginate;

/// Post index row in the relational store.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostIndex {
    pub id: i32,
    pub author_id: i32,
    pub region_id: i32,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub vote_count: i32,
    pub comment_count: i32,
    pub content_ref: Uuid,
    pub is_removed: bool,
}

const POST_COLUMNS: &str = "id, author_id, region_id, title, created_at, updated_at, \
                            vote_count, comment_count, content_ref, is_removed";

/// Fetch one live (not removed) post index.
pub async fn find_live_post(pool: &PgPool, id: i32) -> Result<Option<PostIndex>, ApiError> {
    let post = sqlx::query_as::<_, PostIndex>(&format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE id = $1 AND is_removed = FALSE"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(post)
}

/// Author of a live post; `None` when the post is absent or removed.
pub async fn post_author_id(pool: &PgPool, id: i32) -> Result<Option<i32>, ApiError> {
    let author: Option<i32> =
        sqlx::query_scalar("SELECT author_id FROM posts WHERE id = $1 AND is_removed = FALSE")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(author)
}

/// Pair index rows with their content documents, preserving index order.
///
/// Indices with no matching content pair with `None`; the listing is never
/// aborted because a document went missing.
pub fn zip_with_contents(
    indices: Vec<PostIndex>,
    contents: Vec<PostContent>,
) -> Vec<(PostIndex, Option<PostContent>)> {
    let by_id: std::collections::HashMap<Uuid, PostContent> =
        contents.into_iter().map(|c| (c.id, c)).collect();

    indices
        .into_iter()
        .map(|index| {
            let content = by_id.get(&index.content_ref).cloned();
            (index, content)
        })
        .collect()
}

/// One page of a region's live posts, newest update first, joined with
/// whatever content documents the batched lookup returns.
pub async fn list_posts(
    pool: &PgPool,
    store: &dyn ContentStore,
    region: i32,
    page: i32,
    items_per_page: i32,
) -> Result<Vec<(PostIndex, Option<PostContent>)>, ApiError> {
    let (offset, limit) = paginate(page, items_per_page)?;

    let indices = sqlx::query_as::<_, PostIndex>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        WHERE region_id = $1 AND is_removed = FALSE
        ORDER BY updated_at DESC
        OFFSET $2 LIMIT $3
        "#
    ))
    .bind(region)
    .bind(offset)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let refs: Vec<Uuid> = indices.iter().map(|p| p.content_ref).collect();
    let contents = store.find_post_contents(&refs).await?;

    Ok(zip_with_contents(indices, contents))
}

/// Fetch one post with its content document.
///
/// Unlike the listing, the detail view does not tolerate a missing
/// document: the post is reported absent.
pub async fn find_post(
    pool: &PgPool,
    store: &dyn ContentStore,
    id: i32,
) -> Result<(PostIndex, PostContent), ApiError> {
    let index = find_live_post(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("post"))?;

    let content = store
        .find_post_content(index.content_ref)
        .await?
        .ok_or_else(|| ApiError::not_found("post"))?;

    Ok((index, content))
}

/// Create a post: content document first, then the index row.
///
/// On index failure the just-written document is deleted best-effort; a
/// failure of that cleanup only leaks an unreferenced document.
pub async fn create_post(
    pool: &PgPool,
    store: &dyn ContentStore,
    author_id: i32,
    region_id: i32,
    title: &str,
    text: &str,
) -> Result<i32, ApiError> {
    let content = PostContent::create(text);
    store.insert_post_content(&content).await?;

    let now = Utc::now();
    let inserted: Result<i32, sqlx::Error> = sqlx::query_scalar(
        r#"
        INSERT INTO posts (author_id, region_id, title, created_at, updated_at, content_ref)
        VALUES ($1, $2, $3, $4, $4, $5)
        RETURNING id
        "#,
    )
    .bind(author_id)
    .bind(region_id)
    .bind(title)
    .bind(now)
    .bind(content.id)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(id) => Ok(id),
        Err(err) => {
            if let Err(cleanup) = store.delete_post_content(content.id).await {
                tracing::warn!("orphaned post content {} not cleaned up: {cleanup}", content.id);
            }
            if is_foreign_key_violation(&err) {
                Err(ApiError::invalid_input("region does not exist"))
            } else {
                Err(err.into())
            }
        }
    }
}

/// Apply a title/text patch. The title lives in the index, the text in the
/// content document; `updated_at` is bumped whenever any field is present.
pub async fn update_post(
    pool: &PgPool,
    store: &dyn ContentStore,
    id: i32,
    title: Option<&str>,
    text: Option<&str>,
) -> Result<(), ApiError> {
    let index = find_live_post(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("post"))?;

    sqlx::query("UPDATE posts SET title = COALESCE($2, title), updated_at = $3 WHERE id = $1")
        .bind(id)
        .bind(title)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    if let Some(text) = text {
        store.update_post_text(index.content_ref, text).await?;
    }

    Ok(())
}

/// Soft-delete a post.
pub async fn remove_post(pool: &PgPool, id: i32) -> Result<(), ApiError> {
    let result = sqlx::query("UPDATE posts SET is_removed = TRUE WHERE id = $1 AND is_removed = FALSE")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("post"));
    }
    Ok(())
}

/// Upload images into the slots a mask assigned them.
///
/// All uploads run concurrently; the slot array is written back only after
/// every upload completes. When one of N uploads fails the others are not
/// rolled back — their blobs stay in the bucket unreferenced and the error
/// propagates. Best-effort, non-atomic.
pub async fn update_post_images(
    pool: &PgPool,
    store: &dyn ContentStore,
    blobs: &Arc<dyn BlobBucket>,
    id: i32,
    files: Vec<(usize, Vec<u8>)>,
) -> Result<(), ApiError> {
    let index = find_live_post(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("post"))?;

    let uploads = files.into_iter().map(|(slot, data)| {
        let bucket = Arc::clone(blobs);
        async move { bucket.upload(data).await.map(|blob| (slot, Some(blob))) }
    });
    let assignments: Vec<(usize, Option<Uuid>)> = join_all(uploads)
        .await
        .into_iter()
        .collect::<Result<_, _>>()?;

    let content = store
        .find_post_content(index.content_ref)
        .await?
        .ok_or_else(|| ApiError::not_found("post"))?;

    let merged = apply_image_slots(&content.image_refs, &assignments);
    store.set_post_images(index.content_ref, &merged).await
}

/// Clear the slots a mask references and delete the displaced blobs.
///
/// Out-of-range and already-empty slots are silent no-ops. Blob deletion
/// is best-effort: the slot array is the source of truth and has already
/// been written when deletion starts.
pub async fn remove_post_images(
    pool: &PgPool,
    store: &dyn ContentStore,
    blobs: &Arc<dyn BlobBucket>,
    id: i32,
    slots: &[usize],
) -> Result<(), ApiError> {
    let index = find_live_post(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("post"))?;

    let content = store
        .find_post_content(index.content_ref)
        .await?
        .ok_or_else(|| ApiError::not_found("post"))?;

    let (cleared, displaced) = clear_image_slots(&content.image_refs, slots);
    store.set_post_images(index.content_ref, &cleared).await?;

    let deletions = displaced.into_iter().map(|blob| {
        let bucket = Arc::clone(blobs);
        async move {
            if let Err(e) = bucket.delete(blob).await {
                tracing::warn!("displaced blob {blob} not deleted: {e}");
            }
        }
    });
    join_all(deletions).await;

    Ok(())
}

/// Blob occupying a slot of a post's image array, for serving.
pub async fn find_post_image(
    pool: &PgPool,
    store: &dyn ContentStore,
    id: i32,
    slot: usize,
) -> Result<Option<Uuid>, ApiError> {
    let (_, content) = find_post(pool, store, id).await?;
    Ok(content.image_refs.get(slot).copied().flatten())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(id: i32, content_ref: Uuid) -> PostIndex {
        PostIndex {
            id,
            author_id: 1,
            region_id: 1,
            title: format!("post {id}"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            vote_count: 0,
            comment_count: 0,
            content_ref,
            is_removed: false,
        }
    }

    fn content(text: &str) -> PostContent {
        PostContent::create(text)
    }

    #[test]
    fn test_zip_preserves_index_order() {
        let c1 = content("first");
        let c2 = content("second");
        let c3 = content("third");
        let indices = vec![index(1, c1.id), index(2, c2.id), index(3, c3.id)];

        // Deliver contents shuffled; output must follow the index order.
        let pairs = zip_with_contents(indices, vec![c3.clone(), c1.clone(), c2.clone()]);
        let texts: Vec<_> = pairs
            .iter()
            .map(|(_, c)| c.as_ref().unwrap().text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_zip_tolerates_missing_content() {
        let c1 = content("first");
        let c3 = content("third");
        let indices = vec![index(1, c1.id), index(2, Uuid::new_v4()), index(3, c3.id)];

        let pairs = zip_with_contents(indices, vec![c1, c3]);
        assert_eq!(pairs.len(), 3);
        assert!(pairs[0].1.is_some());
        assert!(pairs[1].1.is_none());
        assert!(pairs[2].1.is_some());
        assert_eq!(pairs[1].0.id, 2);
    }

    #[test]
    fn test_zip_empty_page() {
        assert!(zip_with_contents(Vec::new(), Vec::new()).is_empty());
    }
}
