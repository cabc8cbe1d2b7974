/**
 * Application State Management
 *
 * `AppState` is the central state container: the relational pool, the two
 * content-side ports and the WeChat client, all cheaply cloneable. The
 * `FromRef` impls let handlers extract just the part they use.
 *
 * There is no shared mutable in-process state: every request works
 * directly against the stores.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::wechat::WechatClient;
use crate::content::{BlobBucket, ContentStore};
use crate::server::config::ServerConfig;

/// Application state shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Relational store (post/comment indices, users, votes, regions).
    pub pool: PgPool,
    /// Document store for post and comment content.
    pub content: Arc<dyn ContentStore>,
    /// Image blob storage.
    pub blobs: Arc<dyn BlobBucket>,
    /// WeChat code-exchange client.
    pub wechat: Arc<WechatClient>,
    /// Runtime configuration (JWT secret, ports, paths).
    pub config: Arc<ServerConfig>,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ContentStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.content.clone()
    }
}

impl FromRef<AppState> for Arc<dyn BlobBucket> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.blobs.clone()
    }
}

#[cfg(test)]
impl AppState {
    /// State wired to in-memory stores and a lazy (never-connected) pool,
    /// for tests that exercise extractors and handler plumbing.
    pub fn for_tests() -> Self {
        use crate::content::{MemoryBlobBucket, MemoryContentStore};

        let config = ServerConfig::for_tests();
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool construction cannot fail on a well-formed url");

        Self {
            pool,
            content: Arc::new(MemoryContentStore::new()),
            blobs: Arc::new(MemoryBlobBucket::new()),
            wechat: Arc::new(WechatClient::new(
                config.wechat_app_id.clone(),
                config.wechat_app_secret.clone(),
            )),
            config: Arc::new(config),
        }
    }
}
