/**
 * Content Store
 *
 * Post and comment content documents. A `PostContent` carries the body
 * text and the nine-slot image array; a `CommentContent` carries body text
 * only. Documents are addressed by the UUID the relational index stores in
 * its `content_ref` column.
 *
 * The store is a port so the aggregation and image-update paths can be
 * exercised against an in-memory adapter. The PostgreSQL adapter keeps one
 * JSONB row per document and updates fields in place (`jsonb_set`) rather
 * than rewriting whole documents.
 */

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Post body plus image slot array. `image_refs[i]` is the blob occupying
/// slot `i`; the vector may be shorter than the highest slot ever assigned
/// and grows with zero-extension on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
    pub id: Uuid,
    pub text: String,
    pub image_refs: Vec<Option<Uuid>>,
}

impl PostContent {
    /// Fresh content document with a generated id, empty text and no images.
    pub fn create(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            image_refs: Vec::new(),
        }
    }

    /// Number of occupied image slots.
    pub fn image_count(&self) -> usize {
        self.image_refs.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Comment body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentContent {
    pub id: Uuid,
    pub text: String,
}

impl CommentContent {
    pub fn create(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
        }
    }
}

/// Document-store port consumed by the post and comment paths.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn insert_post_content(&self, content: &PostContent) -> Result<(), ApiError>;

    async fn find_post_content(&self, id: Uuid) -> Result<Option<PostContent>, ApiError>;

    /// Batched lookup for the listing path. Missing ids are simply absent
    /// from the result; the caller tolerates the gap.
    async fn find_post_contents(&self, ids: &[Uuid]) -> Result<Vec<PostContent>, ApiError>;

    async fn update_post_text(&self, id: Uuid, text: &str) -> Result<(), ApiError>;

    /// Overwrite the whole slot array.
    async fn set_post_images(&self, id: Uuid, refs: &[Option<Uuid>]) -> Result<(), ApiError>;

    /// Compensation step of the post-creation saga.
    async fn delete_post_content(&self, id: Uuid) -> Result<(), ApiError>;

    async fn insert_comment_content(&self, content: &CommentContent) -> Result<(), ApiError>;

    async fn find_comment_contents(&self, ids: &[Uuid]) -> Result<Vec<CommentContent>, ApiError>;

    /// Compensation step of the comment-creation saga.
    async fn delete_comment_content(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Merge slot assignments into an existing slot array.
///
/// The array is zero-extended when an assignment lands beyond its current
/// length, matching how the slot array grows on upload. Assignments are
/// applied in order; slots are 0-8 by construction (mask digits).
pub fn apply_image_slots(
    refs: &[Option<Uuid>],
    assignments: &[(usize, Option<Uuid>)],
) -> Vec<Option<Uuid>> {
    let mut merged = refs.to_vec();
    if let Some(max_slot) = assignments.iter().map(|(slot, _)| *slot).max() {
        if merged.len() <= max_slot {
            merged.resize(max_slot + 1, None);
        }
    }
    for (slot, blob) in assignments {
        merged[*slot] = *blob;
    }
    merged
}

/// Clear the given slots, returning the new array and the blob ids that
/// were displaced.
///
/// Out-of-range slots and already-empty slots are silent no-ops; the array
/// never shrinks.
pub fn clear_image_slots(refs: &[Option<Uuid>], slots: &[usize]) -> (Vec<Option<Uuid>>, Vec<Uuid>) {
    let mut cleared = refs.to_vec();
    let mut displaced = Vec::new();
    for slot in slots {
        if let Some(entry) = cleared.get_mut(*slot) {
            if let Some(blob) = entry.take() {
                displaced.push(blob);
            }
        }
    }
    (cleared, displaced)
}

/// PostgreSQL adapter: one JSONB row per document.
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn insert_post_content(&self, content: &PostContent) -> Result<(), ApiError> {
        sqlx::query("INSERT INTO post_contents (id, doc) VALUES ($1, $2)")
            .bind(content.id)
            .bind(Json(content))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_post_content(&self, id: Uuid) -> Result<Option<PostContent>, ApiError> {
        let doc: Option<Json<PostContent>> =
            sqlx::query_scalar("SELECT doc FROM post_contents WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(doc.map(|json| json.0))
    }

    async fn find_post_contents(&self, ids: &[Uuid]) -> Result<Vec<PostContent>, ApiError> {
        let docs: Vec<Json<PostContent>> =
            sqlx::query_scalar("SELECT doc FROM post_contents WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(docs.into_iter().map(|json| json.0).collect())
    }

    async fn update_post_text(&self, id: Uuid, text: &str) -> Result<(), ApiError> {
        sqlx::query(
            "UPDATE post_contents SET doc = jsonb_set(doc, '{text}', to_jsonb($2::text)) WHERE id = $1",
        )
        .bind(id)
        .bind(text)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_post_images(&self, id: Uuid, refs: &[Option<Uuid>]) -> Result<(), ApiError> {
        sqlx::query("UPDATE post_contents SET doc = jsonb_set(doc, '{image_refs}', $2) WHERE id = $1")
            .bind(id)
            .bind(Json(refs))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_post_content(&self, id: Uuid) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM post_contents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_comment_content(&self, content: &CommentContent) -> Result<(), ApiError> {
        sqlx::query("INSERT INTO comment_contents (id, doc) VALUES ($1, $2)")
            .bind(content.id)
            .bind(Json(content))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_comment_contents(&self, ids: &[Uuid]) -> Result<Vec<CommentContent>, ApiError> {
        let docs: Vec<Json<CommentContent>> =
            sqlx::query_scalar("SELECT doc FROM comment_contents WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(docs.into_iter().map(|json| json.0).collect())
    }

    async fn delete_comment_content(&self, id: Uuid) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM comment_contents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// In-memory adapter for tests.
#[derive(Default)]
pub struct MemoryContentStore {
    posts: Mutex<HashMap<Uuid, PostContent>>,
    comments: Mutex<HashMap<Uuid, CommentContent>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn insert_post_content(&self, content: &PostContent) -> Result<(), ApiError> {
        self.posts
            .lock()
            .unwrap()
            .insert(content.id, content.clone());
        Ok(())
    }

    async fn find_post_content(&self, id: Uuid) -> Result<Option<PostContent>, ApiError> {
        Ok(self.posts.lock().unwrap().get(&id).cloned())
    }

    async fn find_post_contents(&self, ids: &[Uuid]) -> Result<Vec<PostContent>, ApiError> {
        let posts = self.posts.lock().unwrap();
        Ok(ids.iter().filter_map(|id| posts.get(id).cloned()).collect())
    }

    async fn update_post_text(&self, id: Uuid, text: &str) -> Result<(), ApiError> {
        let mut posts = self.posts.lock().unwrap();
        let content = posts
            .get_mut(&id)
            .ok_or_else(|| ApiError::content_store("post content missing"))?;
        content.text = text.to_string();
        Ok(())
    }

    async fn set_post_images(&self, id: Uuid, refs: &[Option<Uuid>]) -> Result<(), ApiError> {
        let mut posts = self.posts.lock().unwrap();
        let content = posts
            .get_mut(&id)
            .ok_or_else(|| ApiError::content_store("post content missing"))?;
        content.image_refs = refs.to_vec();
        Ok(())
    }

    async fn delete_post_content(&self, id: Uuid) -> Result<(), ApiError> {
        self.posts.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn insert_comment_content(&self, content: &CommentContent) -> Result<(), ApiError> {
        self.comments
            .lock()
            .unwrap()
            .insert(content.id, content.clone());
        Ok(())
    }

    async fn find_comment_contents(&self, ids: &[Uuid]) -> Result<Vec<CommentContent>, ApiError> {
        let comments = self.comments.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| comments.get(id).cloned())
            .collect())
    }

    async fn delete_comment_content(&self, id: Uuid) -> Result<(), ApiError> {
        self.comments.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob() -> Option<Uuid> {
        Some(Uuid::new_v4())
    }

    #[test]
    fn test_apply_zero_extends() {
        let existing = vec![blob()];
        let new_blob = blob();
        let merged = apply_image_slots(&existing, &[(4, new_blob)]);

        assert_eq!(merged.len(), 5);
        assert_eq!(merged[0], existing[0]);
        assert_eq!(merged[1], None);
        assert_eq!(merged[4], new_blob);
    }

    #[test]
    fn test_apply_overwrites_occupied_slot() {
        let old = blob();
        let new = blob();
        let merged = apply_image_slots(&[old], &[(0, new)]);
        assert_eq!(merged, vec![new]);
    }

    #[test]
    fn test_apply_empty_assignments_is_identity() {
        let existing = vec![blob(), None, blob()];
        assert_eq!(apply_image_slots(&existing, &[]), existing);
    }

    #[test]
    fn test_clear_reports_displaced_blobs() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let refs = vec![Some(a), None, Some(b)];

        let (cleared, displaced) = clear_image_slots(&refs, &[0, 2]);
        assert_eq!(cleared, vec![None, None, None]);
        assert_eq!(displaced, vec![a, b]);
    }

    #[test]
    fn test_clear_out_of_range_is_noop() {
        let a = Uuid::new_v4();
        let refs = vec![Some(a)];

        let (cleared, displaced) = clear_image_slots(&refs, &[5, 8]);
        assert_eq!(cleared, refs);
        assert!(displaced.is_empty());
    }

    #[test]
    fn test_clear_empty_slot_is_noop() {
        let refs = vec![None, None];
        let (cleared, displaced) = clear_image_slots(&refs, &[1]);
        assert_eq!(cleared, refs);
        assert!(displaced.is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_batch_lookup_skips_missing() {
        let store = MemoryContentStore::new();
        let present = PostContent::create("here");
        store.insert_post_content(&present).await.unwrap();

        let found = store
            .find_post_contents(&[present.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, present.id);
    }

    #[tokio::test]
    async fn test_memory_store_field_updates() {
        let store = MemoryContentStore::new();
        let content = PostContent::create("before");
        store.insert_post_content(&content).await.unwrap();

        store.update_post_text(content.id, "after").await.unwrap();
        let refs = vec![blob(), None];
        store.set_post_images(content.id, &refs).await.unwrap();

        let reloaded = store.find_post_content(content.id).await.unwrap().unwrap();
        assert_eq!(reloaded.text, "after");
        assert_eq!(reloaded.image_refs, refs);
    }
}
