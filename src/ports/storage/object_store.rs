use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{
    errors::StorageResult,
    models::{
        AccessControlList, BucketSummary, CannedAcl, ObjectIdentifier, ObjectMetadata,
        ObjectSummary, ObjectVersionInfo, PutObjectOptions, VersioningStatus,
    },
    value_objects::{BucketName, ObjectKey},
};

/// Port for bucket-level operations.
///
/// Every call is a single shot against the backing service; callers get no
/// retry or backoff from this layer.
#[async_trait]
pub trait BucketStore: Send + Sync + 'static {
    /// Create a bucket in the client's configured region
    async fn create_bucket(&self, name: &BucketName) -> StorageResult<()>;

    /// Check whether a bucket exists
    async fn bucket_exists(&self, name: &BucketName) -> StorageResult<bool>;

    /// Delete a bucket. The bucket must be empty of objects and versions.
    async fn delete_bucket(&self, name: &BucketName) -> StorageResult<()>;

    /// List all buckets owned by the caller
    async fn list_buckets(&self) -> StorageResult<Vec<BucketSummary>>;

    /// Turn versioning on for a bucket
    async fn enable_versioning(&self, name: &BucketName) -> StorageResult<()>;

    /// Read back the bucket's versioning state
    async fn versioning_status(&self, name: &BucketName) -> StorageResult<VersioningStatus>;
}

/// Port for object-level operations within buckets
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Store object data, optionally with ACL, encryption, and storage-class
    /// attributes. Returns the metadata the service reported for the upload.
    async fn put_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        data: Bytes,
        options: &PutObjectOptions,
    ) -> StorageResult<ObjectMetadata>;

    /// Retrieve object data (the latest version)
    async fn get_object(&self, bucket: &BucketName, key: &ObjectKey) -> StorageResult<Bytes>;

    /// Fetch an object's metadata without its data
    async fn head_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<ObjectMetadata>;

    /// Copy an object between buckets server-side; no bytes pass through the
    /// caller.
    async fn copy_object(
        &self,
        source_bucket: &BucketName,
        source_key: &ObjectKey,
        dest_bucket: &BucketName,
        dest_key: &ObjectKey,
    ) -> StorageResult<()>;

    /// Delete a single object
    async fn delete_object(&self, bucket: &BucketName, key: &ObjectKey) -> StorageResult<()>;

    /// Delete a batch of objects, each optionally pinned to a version
    async fn delete_objects(
        &self,
        bucket: &BucketName,
        objects: &[ObjectIdentifier],
    ) -> StorageResult<()>;

    /// Enumerate all objects in a bucket, following pagination to exhaustion
    async fn list_objects(&self, bucket: &BucketName) -> StorageResult<Vec<ObjectSummary>>;

    /// Enumerate all object versions in a bucket, following pagination to
    /// exhaustion
    async fn list_object_versions(
        &self,
        bucket: &BucketName,
    ) -> StorageResult<Vec<ObjectVersionInfo>>;

    /// Read an object's access-control grants
    async fn get_object_acl(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<AccessControlList>;

    /// Replace an object's ACL with a canned one
    async fn put_object_acl(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        acl: CannedAcl,
    ) -> StorageResult<()>;
}
