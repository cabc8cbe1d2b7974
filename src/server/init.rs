/**
 * Server Initialization
 *
 * Builds the application from configuration: database pool and migrations,
 * content-store and blob-bucket adapters, the WeChat client, and finally
 * the router with its auth middleware.
 */

use std::sync::Arc;

use axum::Router;

use crate::auth::wechat::WechatClient;
use crate::content::{FsBlobBucket, PgContentStore};
use crate::routes::router::create_router;
use crate::server::config::{load_database, ServerConfig};
use crate::server::state::AppState;

/// Create and configure the Axum application.
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, sqlx::Error> {
    tracing::info!("initializing forum backend");

    let pool = load_database(&config).await?;

    let content = Arc::new(PgContentStore::new(pool.clone()));
    let blobs = Arc::new(FsBlobBucket::new(config.blob_root.clone()));
    let wechat = Arc::new(WechatClient::new(
        config.wechat_app_id.clone(),
        config.wechat_app_secret.clone(),
    ));

    let app_state = AppState {
        pool,
        content,
        blobs,
        wechat,
        config: Arc::new(config),
    };

    tracing::info!("application state initialized");
    Ok(create_router(app_state))
}
