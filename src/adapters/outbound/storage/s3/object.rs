use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use bytes::Bytes;
use http::Method;
use tracing::debug;

use crate::{
    adapters::outbound::storage::error::StoreError,
    adapters::outbound::storage::s3::client::S3Request,
    adapters::outbound::storage::s3::{S3StorageAdapter, xml},
    domain::{
        errors::StorageResult,
        models::{
            AccessControlList, CannedAcl, Grant, Grantee, ObjectIdentifier, ObjectMetadata,
            ObjectSummary, ObjectVersionInfo, Permission, PutObjectOptions, ServerSideEncryption,
            StorageClass,
        },
        value_objects::{BucketName, ObjectKey, VersionId},
    },
    ports::storage::ObjectStore,
};

/// Read a response header as an owned string
fn header_str(headers: &reqwest::header::HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

/// Build object metadata from the headers of a GET/HEAD/PUT response
fn metadata_from_headers(
    headers: &reqwest::header::HeaderMap,
    content_length: Option<u64>,
) -> ObjectMetadata {
    ObjectMetadata {
        content_type: header_str(headers, "content-type"),
        content_length: content_length
            .or_else(|| header_str(headers, "content-length").and_then(|v| v.parse().ok()))
            .unwrap_or(0),
        etag: xml::trim_etag(header_str(headers, "etag")),
        last_modified: header_str(headers, "last-modified")
            .and_then(|v| chrono::DateTime::parse_from_rfc2822(&v).ok())
            .map(|dt| dt.with_timezone(&chrono::Utc)),
        storage_class: header_str(headers, "x-amz-storage-class")
            .and_then(|v| StorageClass::parse(&v)),
        server_side_encryption: header_str(headers, "x-amz-server-side-encryption")
            .and_then(|v| ServerSideEncryption::parse(&v)),
        version_id: header_str(headers, "x-amz-version-id")
            .and_then(|v| VersionId::new(v).ok()),
    }
}

fn grant_from_entry(entry: xml::GrantEntry) -> Result<Grant, StoreError> {
    let permission = Permission::parse(&entry.permission).ok_or_else(|| {
        StoreError::Other(format!(
            "service returned unknown permission: {}",
            entry.permission
        ))
    })?;

    let grantee = if let Some(uri) = entry.grantee.uri {
        Grantee::Group { uri }
    } else if let Some(id) = entry.grantee.id {
        Grantee::CanonicalUser {
            id,
            display_name: entry.grantee.display_name,
        }
    } else {
        return Err(StoreError::Other(
            "service returned grantee with neither ID nor URI".to_string(),
        ));
    };

    Ok(Grant {
        grantee,
        permission,
    })
}

#[async_trait]
impl ObjectStore for S3StorageAdapter {
    async fn put_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        data: Bytes,
        options: &PutObjectOptions,
    ) -> StorageResult<ObjectMetadata> {
        let content_length = data.len() as u64;

        let mut request = S3Request::new(Method::PUT)
            .bucket(bucket.as_str())
            .key(key.as_str())
            .body(data);

        if let Some(content_type) = &options.content_type {
            request = request.header("Content-Type", content_type.clone());
        }
        if let Some(acl) = options.acl {
            request = request.header("x-amz-acl", acl.as_str());
        }
        if let Some(sse) = options.server_side_encryption {
            request = request.header("x-amz-server-side-encryption", sse.as_str());
        }
        if let Some(class) = options.storage_class {
            request = request.header("x-amz-storage-class", class.as_str());
        }

        let response = self
            .client()
            .execute(request)
            .await
            .map_err(|e| e.into_object_error(bucket, key, None, "put_object"))?;

        let mut metadata = metadata_from_headers(response.headers(), Some(content_length));
        // PUT responses carry no Content-Type; reflect what was sent
        metadata.content_type = options.content_type.clone();
        if metadata.storage_class.is_none() {
            metadata.storage_class = options.storage_class;
        }

        debug!(bucket = %bucket, key = %key, size = content_length, "object stored");
        Ok(metadata)
    }

    async fn get_object(&self, bucket: &BucketName, key: &ObjectKey) -> StorageResult<Bytes> {
        let request = S3Request::new(Method::GET)
            .bucket(bucket.as_str())
            .key(key.as_str());

        let response = self
            .client()
            .execute(request)
            .await
            .map_err(|e| e.into_object_error(bucket, key, None, "get_object"))?;

        response
            .bytes()
            .await
            .map_err(|e| StoreError::Transport(e).into_object_error(bucket, key, None, "get_object"))
    }

    async fn head_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<ObjectMetadata> {
        let request = S3Request::new(Method::HEAD)
            .bucket(bucket.as_str())
            .key(key.as_str());

        let response = self
            .client()
            .execute(request)
            .await
            .map_err(|e| e.into_object_error(bucket, key, None, "head_object"))?;

        Ok(metadata_from_headers(response.headers(), None))
    }

    async fn copy_object(
        &self,
        source_bucket: &BucketName,
        source_key: &ObjectKey,
        dest_bucket: &BucketName,
        dest_key: &ObjectKey,
    ) -> StorageResult<()> {
        // The service performs the copy; only the reference travels
        let copy_source = format!(
            "/{}/{}",
            source_bucket.as_str(),
            urlencoding::encode(source_key.as_str()).replace("%2F", "/")
        );

        let request = S3Request::new(Method::PUT)
            .bucket(dest_bucket.as_str())
            .key(dest_key.as_str())
            .header("x-amz-copy-source", copy_source);

        self.client()
            .execute(request)
            .await
            .map_err(|e| e.into_object_error(source_bucket, source_key, None, "copy_object"))?;

        debug!(
            source = %format_args!("{}/{}", source_bucket, source_key),
            dest = %format_args!("{}/{}", dest_bucket, dest_key),
            "object copied server-side"
        );
        Ok(())
    }

    async fn delete_object(&self, bucket: &BucketName, key: &ObjectKey) -> StorageResult<()> {
        let request = S3Request::new(Method::DELETE)
            .bucket(bucket.as_str())
            .key(key.as_str());

        self.client()
            .execute(request)
            .await
            .map_err(|e| e.into_object_error(bucket, key, None, "delete_object"))?;

        debug!(bucket = %bucket, key = %key, "object deleted");
        Ok(())
    }

    async fn delete_objects(
        &self,
        bucket: &BucketName,
        objects: &[ObjectIdentifier],
    ) -> StorageResult<()> {
        // The service rejects an empty Delete document
        if objects.is_empty() {
            return Ok(());
        }

        let document = xml::DeleteDocument {
            objects: objects
                .iter()
                .map(|object| xml::DeleteEntry {
                    key: object.key.as_str().to_string(),
                    version_id: object
                        .version_id
                        .as_ref()
                        .map(|version| version.as_str().to_string()),
                })
                .collect(),
            quiet: false,
        };

        let body = quick_xml::se::to_string(&document)
            .map_err(|e| StoreError::Xml(e.to_string()).into_generic("delete_objects"))?;
        let body = Bytes::from(body);

        // Batch deletes require an integrity header over the body
        let content_md5 = BASE64.encode(md5::compute(&body).0);

        let request = S3Request::new(Method::POST)
            .bucket(bucket.as_str())
            .query("delete", "")
            .header("Content-MD5", content_md5)
            .body(body);

        let response = self
            .client()
            .execute(request)
            .await
            .map_err(|e| e.into_bucket_error(bucket, "delete_objects"))?;

        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e).into_generic("delete_objects"))?;

        let result: xml::DeleteResult = quick_xml::de::from_str(&text)
            .map_err(|e| StoreError::from(e).into_generic("delete_objects"))?;

        if let Some(error) = result.errors.into_iter().next() {
            return Err(StoreError::Service {
                status: 200,
                code: error.code,
                message: format!(
                    "failed to delete '{}': {}",
                    error.key.unwrap_or_default(),
                    error.message.unwrap_or_default()
                ),
            }
            .into_bucket_error(bucket, "delete_objects"));
        }

        debug!(bucket = %bucket, count = objects.len(), "objects batch-deleted");
        Ok(())
    }

    async fn list_objects(&self, bucket: &BucketName) -> StorageResult<Vec<ObjectSummary>> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        // Follow continuation tokens until the listing is exhausted
        loop {
            let mut request = S3Request::new(Method::GET)
                .bucket(bucket.as_str())
                .query("list-type", "2");
            if let Some(token) = &continuation_token {
                request = request.query("continuation-token", token.clone());
            }

            let response = self
                .client()
                .execute(request)
                .await
                .map_err(|e| e.into_bucket_error(bucket, "list_objects"))?;

            let body = response
                .text()
                .await
                .map_err(|e| StoreError::Transport(e).into_generic("list_objects"))?;

            let result: xml::ListBucketResult = quick_xml::de::from_str(&body)
                .map_err(|e| StoreError::from(e).into_generic("list_objects"))?;

            for entry in result.contents {
                let key = ObjectKey::new(entry.key.clone()).map_err(|e| {
                    StoreError::Other(format!("service returned key '{}': {}", entry.key, e))
                        .into_generic("list_objects")
                })?;
                objects.push(ObjectSummary {
                    key,
                    size: entry.size,
                    etag: xml::trim_etag(entry.etag),
                    last_modified: entry.last_modified.as_deref().and_then(xml::parse_timestamp),
                    storage_class: entry.storage_class.as_deref().and_then(StorageClass::parse),
                });
            }

            if !result.is_truncated {
                break;
            }
            match result.next_continuation_token {
                Some(token) => continuation_token = Some(token),
                None => break,
            }
        }

        Ok(objects)
    }

    async fn list_object_versions(
        &self,
        bucket: &BucketName,
    ) -> StorageResult<Vec<ObjectVersionInfo>> {
        let mut versions = Vec::new();
        let mut key_marker: Option<String> = None;
        let mut version_id_marker: Option<String> = None;

        loop {
            let mut request = S3Request::new(Method::GET)
                .bucket(bucket.as_str())
                .query("versions", "");
            if let Some(marker) = &key_marker {
                request = request.query("key-marker", marker.clone());
            }
            if let Some(marker) = &version_id_marker {
                request = request.query("version-id-marker", marker.clone());
            }

            let response = self
                .client()
                .execute(request)
                .await
                .map_err(|e| e.into_bucket_error(bucket, "list_object_versions"))?;

            let body = response
                .text()
                .await
                .map_err(|e| StoreError::Transport(e).into_generic("list_object_versions"))?;

            let result: xml::ListVersionsResult = quick_xml::de::from_str(&body)
                .map_err(|e| StoreError::from(e).into_generic("list_object_versions"))?;

            for entry in result.versions {
                versions.push(version_info(
                    &entry.key,
                    &entry.version_id,
                    entry.is_latest,
                    false,
                    entry.last_modified.as_deref(),
                    entry.size,
                    entry.etag,
                )?);
            }
            for entry in result.delete_markers {
                versions.push(version_info(
                    &entry.key,
                    &entry.version_id,
                    entry.is_latest,
                    true,
                    entry.last_modified.as_deref(),
                    0,
                    None,
                )?);
            }

            if !result.is_truncated {
                break;
            }
            key_marker = result.next_key_marker;
            version_id_marker = result.next_version_id_marker;
            if key_marker.is_none() && version_id_marker.is_none() {
                break;
            }
        }

        Ok(versions)
    }

    async fn get_object_acl(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<AccessControlList> {
        let request = S3Request::new(Method::GET)
            .bucket(bucket.as_str())
            .key(key.as_str())
            .query("acl", "");

        let response = self
            .client()
            .execute(request)
            .await
            .map_err(|e| e.into_object_error(bucket, key, None, "get_object_acl"))?;

        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e).into_generic("get_object_acl"))?;

        let policy: xml::AccessControlPolicy = quick_xml::de::from_str(&body)
            .map_err(|e| StoreError::from(e).into_generic("get_object_acl"))?;

        let mut grants = Vec::with_capacity(policy.access_control_list.grants.len());
        for entry in policy.access_control_list.grants {
            grants.push(
                grant_from_entry(entry)
                    .map_err(|e| e.into_object_error(bucket, key, None, "get_object_acl"))?,
            );
        }

        Ok(AccessControlList {
            owner_id: policy.owner.and_then(|owner| owner.id),
            grants,
        })
    }

    async fn put_object_acl(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        acl: CannedAcl,
    ) -> StorageResult<()> {
        let request = S3Request::new(Method::PUT)
            .bucket(bucket.as_str())
            .key(key.as_str())
            .query("acl", "")
            .header("x-amz-acl", acl.as_str());

        self.client()
            .execute(request)
            .await
            .map_err(|e| e.into_object_error(bucket, key, None, "put_object_acl"))?;

        debug!(bucket = %bucket, key = %key, acl = %acl, "object ACL replaced");
        Ok(())
    }
}

fn version_info(
    key: &str,
    version_id: &str,
    is_latest: bool,
    is_delete_marker: bool,
    last_modified: Option<&str>,
    size: u64,
    etag: Option<String>,
) -> StorageResult<ObjectVersionInfo> {
    let key = ObjectKey::new(key.to_string()).map_err(|e| {
        StoreError::Other(format!("service returned key '{}': {}", key, e))
            .into_generic("list_object_versions")
    })?;
    let version_id = VersionId::new(version_id.to_string()).map_err(|e| {
        StoreError::Other(format!("service returned version id '{}': {}", version_id, e))
            .into_generic("list_object_versions")
    })?;

    Ok(ObjectVersionInfo {
        key,
        version_id,
        is_latest,
        is_delete_marker,
        last_modified: last_modified.and_then(xml::parse_timestamp),
        size,
        etag: xml::trim_etag(etag),
    })
}
