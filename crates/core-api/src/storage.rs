use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use jodidar_database::storage::{BlobError, BlobStore, BucketLayout};

use crate::StorageConfig;

/// Keeps image objects under a local directory while handing out urls in the
/// bucket's public layout, so stored urls stay valid when the objects are synced
/// to the bucket itself.
pub struct LocalBlobStore {
    root: PathBuf,
    layout: BucketLayout,
}

impl LocalBlobStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&config.local_dir),
            layout: BucketLayout::new(&config.bucket, &config.region),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, BlobError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobError::Upload(e.to_string()))?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| BlobError::Upload(e.to_string()))?;

        tracing::debug!(key = %key, content_type = %content_type, size = bytes.len(), "stored object");
        Ok(self.layout.url_for(key))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        tokio::fs::remove_file(self.path_for(key))
            .await
            .map_err(|e| BlobError::Delete(e.to_string()))
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        self.layout.key_for(url)
    }
}
