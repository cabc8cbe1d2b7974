/**
 * Blob Bucket
 *
 * Raw image bytes addressed by UUID. The filesystem adapter shards files
 * two directory levels deep so a single directory never accumulates the
 * whole corpus.
 *
 * Deletion is best-effort everywhere this port is used: a blob that is
 * already gone is not an error, and callers never roll back completed
 * uploads when a sibling upload fails.
 */

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use crate::error::ApiError;

/// Blob storage port.
#[async_trait]
pub trait BlobBucket: Send + Sync {
    /// Store the bytes and return the generated blob id.
    async fn upload(&self, data: Vec<u8>) -> Result<Uuid, ApiError>;

    /// Fetch a blob; `None` when it does not exist.
    async fn download(&self, id: Uuid) -> Result<Option<Vec<u8>>, ApiError>;

    /// Remove a blob. Removing a missing blob is a no-op.
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Local-filesystem adapter.
pub struct FsBlobBucket {
    root: PathBuf,
}

impl FsBlobBucket {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Sharded path: "ab/cd/abcd....".
    fn blob_path(&self, id: Uuid) -> PathBuf {
        let name = id.simple().to_string();
        let mut path = self.root.clone();
        path.push(&name[0..2]);
        path.push(&name[2..4]);
        path.push(name);
        path
    }
}

#[async_trait]
impl BlobBucket for FsBlobBucket {
    async fn upload(&self, data: Vec<u8>) -> Result<Uuid, ApiError> {
        let id = Uuid::new_v4();
        let path = self.blob_path(id);
        let parent = path.parent().expect("sharded path has a parent");

        fs::create_dir_all(parent)
            .await
            .map_err(|e| ApiError::content_store(format!("blob dir creation failed: {e}")))?;
        fs::write(&path, &data)
            .await
            .map_err(|e| ApiError::content_store(format!("blob write failed: {e}")))?;

        Ok(id)
    }

    async fn download(&self, id: Uuid) -> Result<Option<Vec<u8>>, ApiError> {
        match fs::read(self.blob_path(id)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ApiError::content_store(format!("blob read failed: {e}"))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        match fs::remove_file(self.blob_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::content_store(format!("blob delete failed: {e}"))),
        }
    }
}

/// In-memory adapter for tests.
#[derive(Default)]
pub struct MemoryBlobBucket {
    blobs: Mutex<HashMap<Uuid, Vec<u8>>>,
}

impl MemoryBlobBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl BlobBucket for MemoryBlobBucket {
    async fn upload(&self, data: Vec<u8>) -> Result<Uuid, ApiError> {
        let id = Uuid::new_v4();
        self.blobs.lock().unwrap().insert(id, data);
        Ok(id)
    }

    async fn download(&self, id: Uuid) -> Result<Option<Vec<u8>>, ApiError> {
        Ok(self.blobs.lock().unwrap().get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.blobs.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fs_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let bucket = FsBlobBucket::new(dir.path().to_path_buf());

        let id = bucket.upload(b"jpeg bytes".to_vec()).await.unwrap();
        let data = bucket.download(id).await.unwrap();
        assert_eq!(data.as_deref(), Some(b"jpeg bytes".as_ref()));

        bucket.delete(id).await.unwrap();
        assert_eq!(bucket.download(id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fs_delete_missing_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let bucket = FsBlobBucket::new(dir.path().to_path_buf());

        bucket.delete(Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn test_fs_download_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let bucket = FsBlobBucket::new(dir.path().to_path_buf());

        assert_eq!(bucket.download(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_roundtrip() {
        let bucket = MemoryBlobBucket::new();
        let id = bucket.upload(vec![1, 2, 3]).await.unwrap();
        assert_eq!(bucket.download(id).await.unwrap(), Some(vec![1, 2, 3]));
        bucket.delete(id).await.unwrap();
        assert!(bucket.is_empty());
    }
}
