//! Server Module
//!
//! Configuration loading, application state and app creation.
//!
//! # Initialization Flow
//!
//! 1. **Configuration**: `ServerConfig::from_env` collects everything from
//!    environment variables
//! 2. **Database**: connection pool plus `sqlx::migrate!`
//! 3. **State**: pool, content store, blob bucket and WeChat client behind
//!    [`state::AppState`]
//! 4. **Router**: all routes and the auth middleware

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

/// Application state management
pub mod state;

pub use config::ServerConfig;
pub use init::create_app;
pub use state::AppState;
