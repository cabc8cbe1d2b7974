/**
 * Server Configuration
 *
 * Everything comes from environment variables (`.env` is loaded by the
 * binary before this runs):
 *
 * - `DATABASE_URL`      - PostgreSQL connection string (required)
 * - `SERVER_PORT`       - listen port, default 3000
 * - `JWT_SECRET`        - HS256 secret for session tokens
 * - `WECHAT_APP_ID`     - WeChat application id
 * - `WECHAT_APP_SECRET` - WeChat application secret
 * - `BLOB_ROOT`         - directory for image blobs, default ./data/blobs
 *
 * A missing `DATABASE_URL` is fatal; the forum cannot run without its
 * relational store. The other values fall back to development defaults
 * with a warning.
 */

use std::path::PathBuf;

use sqlx::PgPool;

/// Runtime configuration collected at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub wechat_app_id: String,
    pub wechat_app_secret: String,
    pub blob_root: PathBuf,
}

impl ServerConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL is not set".to_string())?;

        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using a development default");
            "development-secret-change-in-production".to_string()
        });

        let wechat_app_id = std::env::var("WECHAT_APP_ID").unwrap_or_else(|_| {
            tracing::warn!("WECHAT_APP_ID not set; code exchange will fail");
            String::new()
        });
        let wechat_app_secret = std::env::var("WECHAT_APP_SECRET").unwrap_or_default();

        let blob_root = std::env::var("BLOB_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/blobs"));

        Ok(Self {
            database_url,
            port,
            jwt_secret,
            wechat_app_id,
            wechat_app_secret,
            blob_root,
        })
    }

    /// Configuration for in-process tests: lazy pool, throwaway secrets.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/unused".to_string(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
            wechat_app_id: "test-app".to_string(),
            wechat_app_secret: "test-app-secret".to_string(),
            blob_root: std::env::temp_dir(),
        }
    }
}

/// Connect the pool and bring the schema up to date.
pub async fn load_database(config: &ServerConfig) -> Result<PgPool, sqlx::Error> {
    tracing::info!("connecting to database");
    let pool = PgPool::connect(&config.database_url).await?;

    tracing::info!("running database migrations");
    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}
