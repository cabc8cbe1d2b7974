/**
 * Post Wire Types
 *
 * Request and response shapes for the post endpoints. List items and the
 * detail view are denormalized joins of the relational index and the
 * content document; a list item tolerates absent content (empty text),
 * the detail view does not.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::PostContent;
use crate::posts::db::PostIndex;

/// One row of `GET /posts`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListItem {
    pub id: i32,
    pub region_id: i32,
    pub title: String,
    pub creation_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
    /// Body text; empty when the content document is unavailable.
    pub text: String,
    pub number_of_votes: i32,
    pub number_of_comments: i32,
}

impl PostListItem {
    pub fn new(index: &PostIndex, content: Option<&PostContent>) -> Self {
        Self {
            id: index.id,
            region_id: index.region_id,
            title: index.title.clone(),
            creation_time: index.created_at,
            update_time: index.updated_at,
            text: content.map(|c| c.text.clone()).unwrap_or_default(),
            number_of_votes: index.vote_count,
            number_of_comments: index.comment_count,
        }
    }
}

/// Detail view of `GET /posts/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInfo {
    pub title: String,
    pub text: String,
    pub author_id: i32,
    pub creation_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
    pub number_of_images: usize,
    pub number_of_votes: i32,
    pub number_of_comments: i32,
}

impl PostInfo {
    pub fn new(index: &PostIndex, content: &PostContent) -> Self {
        Self {
            title: index.title.clone(),
            text: content.text.clone(),
            author_id: index.author_id,
            creation_time: index.created_at,
            update_time: index.updated_at,
            number_of_images: content.image_count(),
            number_of_votes: index.vote_count,
            number_of_comments: index.comment_count,
        }
    }
}

/// Query string of `GET /posts`.
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub region: i32,
    pub page: Option<i32>,
    #[serde(rename = "itemsPerPage")]
    pub items_per_page: Option<i32>,
}

/// Body of `POST /posts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub text: String,
    pub region_id: i32,
}

/// Reply of `POST /posts`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponse {
    pub id: i32,
}

/// Body of `PUT /posts/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct PatchPostRequest {
    pub title: Option<String>,
    pub text: Option<String>,
}

impl PatchPostRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.text.is_none()
    }
}
