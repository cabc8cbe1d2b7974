//! Authentication Module
//!
//! Login is delegated to WeChat: the client obtains a short-lived code from
//! the WeChat SDK, `POST /auth` exchanges it with the provider, the user is
//! upserted by openid, and the response carries a JWT the client presents
//! in the `Jwt` header from then on.
//!
//! # Submodules
//!
//! - **`wechat`** - code exchange client and provider-reply parsing
//! - **`sessions`** - JWT claims, encode/verify
//! - **`users`** - user rows and the upsert-by-openid race protocol
//! - **`permissions`** - the owner-or-admin edit predicate
//! - **`handlers`** - the `POST /auth` handler and its wire types

/// Login handler and wire types
pub mod handlers;

/// Owner-or-admin edit predicate
pub mod permissions;

/// JWT claims and token codec
pub mod sessions;

/// User rows and upsert
pub mod users;

/// WeChat code exchange
pub mod wechat;

pub use permissions::{can_edit, ensure_can_edit};
pub use sessions::{create_token, verify_token, Claims};
pub use users::User;
pub use wechat::{WechatClient, WechatSession};
