use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{ObjectMetadata, PutObjectOptions},
        value_objects::{BucketName, ObjectKey},
    },
    ports::{services::TransferService, storage::ObjectStore},
};

/// Moves files between the local filesystem and the object store
#[derive(Clone)]
pub struct TransferServiceImpl {
    store: Arc<dyn ObjectStore>,
}

impl TransferServiceImpl {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    fn io_error(path: &Path, err: std::io::Error) -> StorageError {
        StorageError::TransportError {
            message: format!("local file '{}': {}", path.display(), err),
        }
    }
}

#[async_trait]
impl TransferService for TransferServiceImpl {
    async fn upload_file(
        &self,
        path: &Path,
        bucket: &BucketName,
        key: &ObjectKey,
        options: &PutObjectOptions,
    ) -> StorageResult<ObjectMetadata> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Self::io_error(path, e))?;
        let size = data.len();

        let metadata = self
            .store
            .put_object(bucket, key, Bytes::from(data), options)
            .await?;

        debug!(
            path = %path.display(),
            bucket = %bucket,
            key = %key,
            size,
            "file uploaded"
        );
        Ok(metadata)
    }

    async fn download_file(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        dest: &Path,
    ) -> StorageResult<u64> {
        let data = self.store.get_object(bucket, key).await?;
        let size = data.len() as u64;

        // Scoped handle: written, flushed, closed before returning
        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| Self::io_error(dest, e))?;
        file.write_all(&data)
            .await
            .map_err(|e| Self::io_error(dest, e))?;
        file.flush().await.map_err(|e| Self::io_error(dest, e))?;

        debug!(
            bucket = %bucket,
            key = %key,
            dest = %dest.display(),
            size,
            "file downloaded"
        );
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::storage::InMemoryStorageAdapter;
    use crate::ports::storage::BucketStore;

    #[tokio::test]
    async fn upload_then_download_round_trips() {
        let adapter = Arc::new(InMemoryStorageAdapter::new());
        let transfer = TransferServiceImpl::new(adapter.clone());

        let bucket = BucketName::new("transfer-bucket".to_string()).unwrap();
        adapter.create_bucket(&bucket).await.unwrap();

        let dir = std::env::temp_dir();
        let source = dir.join("transfer-source.txt");
        let dest = dir.join("transfer-dest.txt");
        tokio::fs::write(&source, b"round trip payload").await.unwrap();

        let key = ObjectKey::new("payload.txt".to_string()).unwrap();
        let metadata = transfer
            .upload_file(&source, &bucket, &key, &PutObjectOptions::default())
            .await
            .unwrap();
        assert_eq!(metadata.content_length, 18);

        let size = transfer.download_file(&bucket, &key, &dest).await.unwrap();
        assert_eq!(size, 18);

        let round_tripped = tokio::fs::read(&dest).await.unwrap();
        assert_eq!(round_tripped, b"round trip payload");

        tokio::fs::remove_file(&source).await.ok();
        tokio::fs::remove_file(&dest).await.ok();
    }

    #[tokio::test]
    async fn upload_missing_file_fails() {
        let adapter = Arc::new(InMemoryStorageAdapter::new());
        let transfer = TransferServiceImpl::new(adapter.clone());

        let bucket = BucketName::new("transfer-bucket".to_string()).unwrap();
        adapter.create_bucket(&bucket).await.unwrap();

        let key = ObjectKey::new("missing.txt".to_string()).unwrap();
        let result = transfer
            .upload_file(
                Path::new("/nonexistent/missing.txt"),
                &bucket,
                &key,
                &PutObjectOptions::default(),
            )
            .await;
        assert!(result.is_err());
    }
}
