use async_trait::async_trait;
use std::path::Path;

use crate::domain::{
    errors::StorageResult,
    models::{ObjectMetadata, PutObjectOptions},
    value_objects::{BucketName, ObjectKey},
};

/// Port for moving data between the local filesystem and object storage
#[async_trait]
pub trait TransferService: Send + Sync + 'static {
    /// Upload a local file under the given key
    async fn upload_file(
        &self,
        path: &Path,
        bucket: &BucketName,
        key: &ObjectKey,
        options: &PutObjectOptions,
    ) -> StorageResult<ObjectMetadata>;

    /// Download an object to a local path, overwriting any existing file
    async fn download_file(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        dest: &Path,
    ) -> StorageResult<u64>;
}
