//! In-memory implementation of the storage ports.
//!
//! Mirrors the observable behavior of the real service closely enough to back
//! the test suites and local demonstration runs: per-bucket version chains,
//! per-version ACLs, delete markers, and the empty-before-delete rule.
//! Payload bytes live in an `object_store` in-memory store keyed by a
//! versioned path; everything else is bookkeeping behind a lock.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore as ObjectStoreBackend, PutPayload};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    adapters::outbound::storage::error::object_store_error,
    domain::{
        errors::{StorageError, StorageResult},
        models::{
            ALL_USERS_GROUP, AUTHENTICATED_USERS_GROUP, AccessControlList, BucketSummary,
            CannedAcl, Grant, Grantee, ObjectIdentifier, ObjectMetadata, ObjectSummary,
            ObjectVersionInfo, Permission, PutObjectOptions, ServerSideEncryption, StorageClass,
            VersioningStatus,
        },
        value_objects::{BucketName, ObjectKey, VersionId},
    },
    ports::storage::{BucketStore, ObjectStore},
};

/// Version id the service assigns to uploads into unversioned buckets
const NULL_VERSION_ID: &str = "null";

const DEFAULT_OWNER_ID: &str = "in-memory-owner";

#[derive(Clone)]
pub struct InMemoryStorageAdapter {
    payloads: Arc<InMemory>,
    state: Arc<RwLock<State>>,
    owner_id: String,
}

#[derive(Default)]
struct State {
    buckets: HashMap<String, BucketState>,
}

struct BucketState {
    creation_date: DateTime<Utc>,
    versioning: VersioningStatus,
    // Map of object key -> version chain, oldest first
    objects: HashMap<String, Vec<StoredVersion>>,
}

#[derive(Clone)]
struct StoredVersion {
    version_id: String,
    size: u64,
    etag: Option<String>,
    last_modified: DateTime<Utc>,
    content_type: Option<String>,
    storage_class: Option<StorageClass>,
    server_side_encryption: Option<ServerSideEncryption>,
    acl: AccessControlList,
    delete_marker: bool,
}

impl InMemoryStorageAdapter {
    pub fn new() -> Self {
        Self {
            payloads: Arc::new(InMemory::new()),
            state: Arc::new(RwLock::new(State::default())),
            owner_id: DEFAULT_OWNER_ID.to_string(),
        }
    }

    /// Payload location for a specific version of a key
    fn versioned_path(bucket: &str, key: &str, version_id: &str) -> ObjectPath {
        ObjectPath::from(format!("{}/{}.v_{}", bucket, key, version_id))
    }

    /// Expand a canned ACL into a grant list, owner always in full control
    fn expand_canned_acl(&self, acl: CannedAcl) -> AccessControlList {
        let mut grants = vec![Grant {
            grantee: Grantee::CanonicalUser {
                id: self.owner_id.clone(),
                display_name: None,
            },
            permission: Permission::FullControl,
        }];

        match acl {
            CannedAcl::Private => {}
            CannedAcl::PublicRead => grants.push(Grant {
                grantee: Grantee::Group {
                    uri: ALL_USERS_GROUP.to_string(),
                },
                permission: Permission::Read,
            }),
            CannedAcl::PublicReadWrite => {
                for permission in [Permission::Read, Permission::Write] {
                    grants.push(Grant {
                        grantee: Grantee::Group {
                            uri: ALL_USERS_GROUP.to_string(),
                        },
                        permission,
                    });
                }
            }
            CannedAcl::AuthenticatedRead => grants.push(Grant {
                grantee: Grantee::Group {
                    uri: AUTHENTICATED_USERS_GROUP.to_string(),
                },
                permission: Permission::Read,
            }),
        }

        AccessControlList {
            owner_id: Some(self.owner_id.clone()),
            grants,
        }
    }

    /// Versioning-aware insert shared by put and copy.
    ///
    /// Returns the id assigned to the stored version. Callers report it only
    /// when the bucket is actually versioned, matching the service.
    async fn store_version(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        data: Bytes,
        content_type: Option<String>,
        storage_class: Option<StorageClass>,
        server_side_encryption: Option<ServerSideEncryption>,
        acl: AccessControlList,
    ) -> StorageResult<(String, StoredVersion)> {
        let etag = format!("{:x}", md5::compute(&data));
        let size = data.len() as u64;

        let mut state = self.state.write().await;
        let bucket_state =
            state
                .buckets
                .get_mut(bucket.as_str())
                .ok_or_else(|| StorageError::BucketNotFound {
                    bucket: bucket.clone(),
                })?;

        let versioned = bucket_state.versioning.is_enabled();
        let version_id = if versioned {
            Uuid::new_v4().simple().to_string()
        } else {
            NULL_VERSION_ID.to_string()
        };

        let chain = bucket_state
            .objects
            .entry(key.as_str().to_string())
            .or_default();

        // An unversioned upload replaces the existing null version in place
        if !versioned {
            if let Some(index) = chain
                .iter()
                .position(|version| version.version_id == NULL_VERSION_ID)
            {
                let old = chain.remove(index);
                if !old.delete_marker {
                    let path = Self::versioned_path(bucket.as_str(), key.as_str(), &old.version_id);
                    self.payloads
                        .delete(&path)
                        .await
                        .map_err(|e| object_store_error(e, bucket, key))?;
                }
            }
        }

        let version = StoredVersion {
            version_id: version_id.clone(),
            size,
            etag: Some(etag),
            last_modified: Utc::now(),
            content_type,
            storage_class,
            server_side_encryption,
            acl,
            delete_marker: false,
        };
        chain.push(version.clone());

        let path = Self::versioned_path(bucket.as_str(), key.as_str(), &version_id);
        self.payloads
            .put(&path, PutPayload::from(data))
            .await
            .map_err(|e| object_store_error(e, bucket, key))?;

        Ok((version_id, version))
    }

    fn metadata_for(
        version: &StoredVersion,
        versioning: VersioningStatus,
    ) -> ObjectMetadata {
        ObjectMetadata {
            content_type: version.content_type.clone(),
            content_length: version.size,
            etag: version.etag.clone(),
            last_modified: Some(version.last_modified),
            storage_class: version.storage_class,
            server_side_encryption: version.server_side_encryption,
            version_id: match versioning {
                VersioningStatus::Unversioned => None,
                _ => VersionId::new(version.version_id.clone()).ok(),
            },
        }
    }
}

impl Default for InMemoryStorageAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BucketStore for InMemoryStorageAdapter {
    async fn create_bucket(&self, name: &BucketName) -> StorageResult<()> {
        let mut state = self.state.write().await;
        if state.buckets.contains_key(name.as_str()) {
            return Err(StorageError::BucketAlreadyExists {
                bucket: name.clone(),
            });
        }

        state.buckets.insert(
            name.as_str().to_string(),
            BucketState {
                creation_date: Utc::now(),
                versioning: VersioningStatus::Unversioned,
                objects: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn bucket_exists(&self, name: &BucketName) -> StorageResult<bool> {
        let state = self.state.read().await;
        Ok(state.buckets.contains_key(name.as_str()))
    }

    async fn delete_bucket(&self, name: &BucketName) -> StorageResult<()> {
        let mut state = self.state.write().await;
        let bucket_state =
            state
                .buckets
                .get(name.as_str())
                .ok_or_else(|| StorageError::BucketNotFound {
                    bucket: name.clone(),
                })?;

        // Every object version, delete markers included, blocks deletion
        if bucket_state.objects.values().any(|chain| !chain.is_empty()) {
            return Err(StorageError::BucketNotEmpty {
                bucket: name.clone(),
            });
        }

        state.buckets.remove(name.as_str());
        Ok(())
    }

    async fn list_buckets(&self) -> StorageResult<Vec<BucketSummary>> {
        let state = self.state.read().await;
        let mut summaries: Vec<BucketSummary> = Vec::with_capacity(state.buckets.len());
        for (name, bucket_state) in &state.buckets {
            summaries.push(BucketSummary {
                name: BucketName::new(name.clone()).map_err(|e| {
                    StorageError::ValidationError {
                        message: format!("stored bucket name '{}': {}", name, e),
                    }
                })?,
                creation_date: Some(bucket_state.creation_date),
            });
        }
        summaries.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(summaries)
    }

    async fn enable_versioning(&self, name: &BucketName) -> StorageResult<()> {
        let mut state = self.state.write().await;
        let bucket_state =
            state
                .buckets
                .get_mut(name.as_str())
                .ok_or_else(|| StorageError::BucketNotFound {
                    bucket: name.clone(),
                })?;
        bucket_state.versioning = VersioningStatus::Enabled;
        Ok(())
    }

    async fn versioning_status(&self, name: &BucketName) -> StorageResult<VersioningStatus> {
        let state = self.state.read().await;
        let bucket_state =
            state
                .buckets
                .get(name.as_str())
                .ok_or_else(|| StorageError::BucketNotFound {
                    bucket: name.clone(),
                })?;
        Ok(bucket_state.versioning)
    }
}

#[async_trait]
impl ObjectStore for InMemoryStorageAdapter {
    async fn put_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        data: Bytes,
        options: &PutObjectOptions,
    ) -> StorageResult<ObjectMetadata> {
        let acl = self.expand_canned_acl(options.acl.unwrap_or(CannedAcl::Private));

        let (_, version) = self
            .store_version(
                bucket,
                key,
                data,
                options.content_type.clone(),
                options.storage_class,
                options.server_side_encryption,
                acl,
            )
            .await?;

        let versioning = self.versioning_status(bucket).await?;
        Ok(Self::metadata_for(&version, versioning))
    }

    async fn get_object(&self, bucket: &BucketName, key: &ObjectKey) -> StorageResult<Bytes> {
        let version_id = {
            let state = self.state.read().await;
            let bucket_state =
                state
                    .buckets
                    .get(bucket.as_str())
                    .ok_or_else(|| StorageError::BucketNotFound {
                        bucket: bucket.clone(),
                    })?;
            let chain = bucket_state.objects.get(key.as_str()).ok_or_else(|| {
                StorageError::ObjectNotFound {
                    bucket: bucket.clone(),
                    key: key.clone(),
                }
            })?;
            let latest = chain.last().filter(|version| !version.delete_marker);
            match latest {
                Some(version) => version.version_id.clone(),
                None => {
                    return Err(StorageError::ObjectNotFound {
                        bucket: bucket.clone(),
                        key: key.clone(),
                    });
                }
            }
        };

        let path = Self::versioned_path(bucket.as_str(), key.as_str(), &version_id);
        let result = self
            .payloads
            .get(&path)
            .await
            .map_err(|e| object_store_error(e, bucket, key))?;
        result
            .bytes()
            .await
            .map_err(|e| object_store_error(e, bucket, key))
    }

    async fn head_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<ObjectMetadata> {
        let state = self.state.read().await;
        let bucket_state =
            state
                .buckets
                .get(bucket.as_str())
                .ok_or_else(|| StorageError::BucketNotFound {
                    bucket: bucket.clone(),
                })?;
        let latest = bucket_state
            .objects
            .get(key.as_str())
            .and_then(|chain| chain.last())
            .filter(|version| !version.delete_marker)
            .ok_or_else(|| StorageError::ObjectNotFound {
                bucket: bucket.clone(),
                key: key.clone(),
            })?;

        Ok(Self::metadata_for(latest, bucket_state.versioning))
    }

    async fn copy_object(
        &self,
        source_bucket: &BucketName,
        source_key: &ObjectKey,
        dest_bucket: &BucketName,
        dest_key: &ObjectKey,
    ) -> StorageResult<()> {
        let (data, source) = {
            let state = self.state.read().await;
            let bucket_state = state.buckets.get(source_bucket.as_str()).ok_or_else(|| {
                StorageError::BucketNotFound {
                    bucket: source_bucket.clone(),
                }
            })?;
            let latest = bucket_state
                .objects
                .get(source_key.as_str())
                .and_then(|chain| chain.last())
                .filter(|version| !version.delete_marker)
                .ok_or_else(|| StorageError::ObjectNotFound {
                    bucket: source_bucket.clone(),
                    key: source_key.clone(),
                })?
                .clone();

            let path = Self::versioned_path(
                source_bucket.as_str(),
                source_key.as_str(),
                &latest.version_id,
            );
            let result = self
                .payloads
                .get(&path)
                .await
                .map_err(|e| object_store_error(e, source_bucket, source_key))?;
            let data = result
                .bytes()
                .await
                .map_err(|e| object_store_error(e, source_bucket, source_key))?;
            (data, latest)
        };

        // Copies keep the source attributes but fall back to a private ACL
        self.store_version(
            dest_bucket,
            dest_key,
            data,
            source.content_type.clone(),
            source.storage_class,
            source.server_side_encryption,
            self.expand_canned_acl(CannedAcl::Private),
        )
        .await?;

        Ok(())
    }

    async fn delete_object(&self, bucket: &BucketName, key: &ObjectKey) -> StorageResult<()> {
        let mut state = self.state.write().await;
        let bucket_state =
            state
                .buckets
                .get_mut(bucket.as_str())
                .ok_or_else(|| StorageError::BucketNotFound {
                    bucket: bucket.clone(),
                })?;

        if bucket_state.versioning.is_enabled() {
            // A bare delete on a versioned bucket leaves a tombstone
            let chain = bucket_state
                .objects
                .entry(key.as_str().to_string())
                .or_default();
            chain.push(StoredVersion {
                version_id: Uuid::new_v4().simple().to_string(),
                size: 0,
                etag: None,
                last_modified: Utc::now(),
                content_type: None,
                storage_class: None,
                server_side_encryption: None,
                acl: self.expand_canned_acl(CannedAcl::Private),
                delete_marker: true,
            });
            return Ok(());
        }

        // Unversioned deletes succeed whether or not the key exists
        if let Some(chain) = bucket_state.objects.remove(key.as_str()) {
            for version in chain {
                if !version.delete_marker {
                    let path =
                        Self::versioned_path(bucket.as_str(), key.as_str(), &version.version_id);
                    self.payloads
                        .delete(&path)
                        .await
                        .map_err(|e| object_store_error(e, bucket, key))?;
                }
            }
        }
        Ok(())
    }

    async fn delete_objects(
        &self,
        bucket: &BucketName,
        objects: &[ObjectIdentifier],
    ) -> StorageResult<()> {
        for object in objects {
            match &object.version_id {
                Some(version_id) => {
                    let mut state = self.state.write().await;
                    let bucket_state = state.buckets.get_mut(bucket.as_str()).ok_or_else(|| {
                        StorageError::BucketNotFound {
                            bucket: bucket.clone(),
                        }
                    })?;
                    let chain = bucket_state
                        .objects
                        .get_mut(object.key.as_str())
                        .ok_or_else(|| StorageError::ObjectNotFound {
                            bucket: bucket.clone(),
                            key: object.key.clone(),
                        })?;
                    let index = chain
                        .iter()
                        .position(|version| version.version_id == version_id.as_str())
                        .ok_or_else(|| StorageError::VersionNotFound {
                            bucket: bucket.clone(),
                            key: object.key.clone(),
                            version_id: version_id.clone(),
                        })?;

                    let removed = chain.remove(index);
                    if chain.is_empty() {
                        bucket_state.objects.remove(object.key.as_str());
                    }
                    drop(state);

                    if !removed.delete_marker {
                        let path = Self::versioned_path(
                            bucket.as_str(),
                            object.key.as_str(),
                            &removed.version_id,
                        );
                        self.payloads
                            .delete(&path)
                            .await
                            .map_err(|e| object_store_error(e, bucket, &object.key))?;
                    }
                }
                None => {
                    self.delete_object(bucket, &object.key).await?;
                }
            }
        }
        Ok(())
    }

    async fn list_objects(&self, bucket: &BucketName) -> StorageResult<Vec<ObjectSummary>> {
        let state = self.state.read().await;
        let bucket_state =
            state
                .buckets
                .get(bucket.as_str())
                .ok_or_else(|| StorageError::BucketNotFound {
                    bucket: bucket.clone(),
                })?;

        let mut summaries = Vec::new();
        for (key, chain) in &bucket_state.objects {
            let Some(latest) = chain.last() else {
                continue;
            };
            if latest.delete_marker {
                continue;
            }
            summaries.push(ObjectSummary {
                key: ObjectKey::new(key.clone()).map_err(|e| StorageError::ValidationError {
                    message: format!("stored key '{}': {}", key, e),
                })?,
                size: latest.size,
                etag: latest.etag.clone(),
                last_modified: Some(latest.last_modified),
                storage_class: latest.storage_class,
            });
        }
        summaries.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
        Ok(summaries)
    }

    async fn list_object_versions(
        &self,
        bucket: &BucketName,
    ) -> StorageResult<Vec<ObjectVersionInfo>> {
        let state = self.state.read().await;
        let bucket_state =
            state
                .buckets
                .get(bucket.as_str())
                .ok_or_else(|| StorageError::BucketNotFound {
                    bucket: bucket.clone(),
                })?;

        let mut keys: Vec<&String> = bucket_state.objects.keys().collect();
        keys.sort();

        let mut versions = Vec::new();
        for key in keys {
            let chain = &bucket_state.objects[key];
            // Newest first within a key, like the service's listing
            for (index, version) in chain.iter().enumerate().rev() {
                versions.push(ObjectVersionInfo {
                    key: ObjectKey::new(key.clone()).map_err(|e| {
                        StorageError::ValidationError {
                            message: format!("stored key '{}': {}", key, e),
                        }
                    })?,
                    version_id: VersionId::new(version.version_id.clone()).map_err(|e| {
                        StorageError::ValidationError {
                            message: format!("stored version id '{}': {}", version.version_id, e),
                        }
                    })?,
                    is_latest: index == chain.len() - 1,
                    is_delete_marker: version.delete_marker,
                    last_modified: Some(version.last_modified),
                    size: version.size,
                    etag: version.etag.clone(),
                });
            }
        }
        Ok(versions)
    }

    async fn get_object_acl(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<AccessControlList> {
        let state = self.state.read().await;
        let bucket_state =
            state
                .buckets
                .get(bucket.as_str())
                .ok_or_else(|| StorageError::BucketNotFound {
                    bucket: bucket.clone(),
                })?;
        let latest = bucket_state
            .objects
            .get(key.as_str())
            .and_then(|chain| chain.last())
            .filter(|version| !version.delete_marker)
            .ok_or_else(|| StorageError::ObjectNotFound {
                bucket: bucket.clone(),
                key: key.clone(),
            })?;

        Ok(latest.acl.clone())
    }

    async fn put_object_acl(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        acl: CannedAcl,
    ) -> StorageResult<()> {
        let expanded = self.expand_canned_acl(acl);

        let mut state = self.state.write().await;
        let bucket_state =
            state
                .buckets
                .get_mut(bucket.as_str())
                .ok_or_else(|| StorageError::BucketNotFound {
                    bucket: bucket.clone(),
                })?;
        let latest = bucket_state
            .objects
            .get_mut(key.as_str())
            .and_then(|chain| chain.last_mut())
            .filter(|version| !version.delete_marker)
            .ok_or_else(|| StorageError::ObjectNotFound {
                bucket: bucket.clone(),
                key: key.clone(),
            })?;

        latest.acl = expanded;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canned_acl_expansion() {
        let adapter = InMemoryStorageAdapter::new();

        let private = adapter.expand_canned_acl(CannedAcl::Private);
        assert_eq!(private.grants.len(), 1);
        assert!(!private.is_public_read());

        let public = adapter.expand_canned_acl(CannedAcl::PublicRead);
        assert_eq!(public.grants.len(), 2);
        assert!(public.is_public_read());

        let public_rw = adapter.expand_canned_acl(CannedAcl::PublicReadWrite);
        assert_eq!(public_rw.grants.len(), 3);
    }

    #[tokio::test]
    async fn unversioned_put_overwrites_in_place() {
        let adapter = InMemoryStorageAdapter::new();
        let bucket = BucketName::new("demo-bucket".to_string()).unwrap();
        let key = ObjectKey::new("file.txt".to_string()).unwrap();

        adapter.create_bucket(&bucket).await.unwrap();
        let options = PutObjectOptions::default();
        adapter
            .put_object(&bucket, &key, Bytes::from("one"), &options)
            .await
            .unwrap();
        adapter
            .put_object(&bucket, &key, Bytes::from("two"), &options)
            .await
            .unwrap();

        let versions = adapter.list_object_versions(&bucket).await.unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version_id.as_str(), NULL_VERSION_ID);

        let data = adapter.get_object(&bucket, &key).await.unwrap();
        assert_eq!(data, Bytes::from("two"));
    }

    #[tokio::test]
    async fn versioned_delete_leaves_marker() {
        let adapter = InMemoryStorageAdapter::new();
        let bucket = BucketName::new("demo-bucket".to_string()).unwrap();
        let key = ObjectKey::new("file.txt".to_string()).unwrap();

        adapter.create_bucket(&bucket).await.unwrap();
        adapter.enable_versioning(&bucket).await.unwrap();
        adapter
            .put_object(&bucket, &key, Bytes::from("one"), &PutObjectOptions::default())
            .await
            .unwrap();
        adapter.delete_object(&bucket, &key).await.unwrap();

        let versions = adapter.list_object_versions(&bucket).await.unwrap();
        assert_eq!(versions.len(), 2);
        assert!(versions.iter().any(|v| v.is_delete_marker && v.is_latest));

        // The tombstone hides the object from plain reads
        assert!(matches!(
            adapter.get_object(&bucket, &key).await,
            Err(StorageError::ObjectNotFound { .. })
        ));
    }
}
