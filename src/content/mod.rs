//! Content Module
//!
//! The document-store side of the dual-store layout. Relational tables keep
//! identifiers, counters and foreign refs; everything large or variable
//! (post/comment bodies, the image slot array, image blobs) lives behind
//! the ports defined here.
//!
//! # Ports
//!
//! - **`ContentStore`** - post and comment content documents addressed by
//!   UUID: get-by-id, batched get, field-level update, slot-array overwrite
//! - **`BlobBucket`** - raw image bytes addressed by UUID
//!
//! Production uses the PostgreSQL/JSONB adapter and the local-filesystem
//! bucket; tests use the in-memory adapters.

/// Blob storage port and adapters
pub mod blobs;

/// Content document port and adapters
pub mod store;

pub use blobs::{BlobBucket, FsBlobBucket, MemoryBlobBucket};
pub use store::{
    apply_image_slots, clear_image_slots, CommentContent, ContentStore, MemoryContentStore,
    PgContentStore, PostContent,
};
