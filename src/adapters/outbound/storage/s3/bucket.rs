use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use tracing::debug;

use crate::{
    adapters::outbound::storage::error::StoreError,
    adapters::outbound::storage::s3::client::S3Request,
    adapters::outbound::storage::s3::{S3StorageAdapter, xml},
    domain::{
        errors::StorageResult,
        models::{BucketSummary, VersioningStatus},
        value_objects::BucketName,
    },
    ports::storage::BucketStore,
};

#[async_trait]
impl BucketStore for S3StorageAdapter {
    async fn create_bucket(&self, name: &BucketName) -> StorageResult<()> {
        // The default region rejects an explicit location constraint; every
        // other region requires one.
        let body = if self.client().is_default_region() {
            Bytes::new()
        } else {
            Bytes::from(format!(
                "<CreateBucketConfiguration><LocationConstraint>{}</LocationConstraint></CreateBucketConfiguration>",
                self.client().region()
            ))
        };

        let request = S3Request::new(Method::PUT).bucket(name.as_str()).body(body);
        self.client()
            .execute(request)
            .await
            .map_err(|e| e.into_bucket_error(name, "create_bucket"))?;

        debug!(bucket = %name, region = self.client().region(), "bucket created");
        Ok(())
    }

    async fn bucket_exists(&self, name: &BucketName) -> StorageResult<bool> {
        let request = S3Request::new(Method::HEAD).bucket(name.as_str());
        match self.client().execute(request).await {
            Ok(_) => Ok(true),
            Err(StoreError::Service { status: 404, .. }) => Ok(false),
            Err(e) => Err(e.into_bucket_error(name, "bucket_exists")),
        }
    }

    async fn delete_bucket(&self, name: &BucketName) -> StorageResult<()> {
        let request = S3Request::new(Method::DELETE).bucket(name.as_str());
        self.client()
            .execute(request)
            .await
            .map_err(|e| e.into_bucket_error(name, "delete_bucket"))?;

        debug!(bucket = %name, "bucket deleted");
        Ok(())
    }

    async fn list_buckets(&self) -> StorageResult<Vec<BucketSummary>> {
        let request = S3Request::new(Method::GET);
        let response = self
            .client()
            .execute(request)
            .await
            .map_err(|e| e.into_generic("list_buckets"))?;

        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e).into_generic("list_buckets"))?;

        let result: xml::ListAllMyBucketsResult = quick_xml::de::from_str(&body)
            .map_err(|e| StoreError::from(e).into_generic("list_buckets"))?;

        let mut buckets = Vec::with_capacity(result.buckets.entries.len());
        for entry in result.buckets.entries {
            // Names the service hands back are taken at face value
            let name = BucketName::new(entry.name.clone()).map_err(|e| {
                StoreError::Other(format!("service returned bucket name '{}': {}", entry.name, e))
                    .into_generic("list_buckets")
            })?;
            buckets.push(BucketSummary {
                name,
                creation_date: entry.creation_date.as_deref().and_then(xml::parse_timestamp),
            });
        }

        Ok(buckets)
    }

    async fn enable_versioning(&self, name: &BucketName) -> StorageResult<()> {
        let body = "<VersioningConfiguration><Status>Enabled</Status></VersioningConfiguration>";

        let request = S3Request::new(Method::PUT)
            .bucket(name.as_str())
            .query("versioning", "")
            .body(Bytes::from(body));
        self.client()
            .execute(request)
            .await
            .map_err(|e| e.into_bucket_error(name, "enable_versioning"))?;

        debug!(bucket = %name, "versioning enabled");
        Ok(())
    }

    async fn versioning_status(&self, name: &BucketName) -> StorageResult<VersioningStatus> {
        let request = S3Request::new(Method::GET)
            .bucket(name.as_str())
            .query("versioning", "");
        let response = self
            .client()
            .execute(request)
            .await
            .map_err(|e| e.into_bucket_error(name, "versioning_status"))?;

        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e).into_generic("versioning_status"))?;

        let config: xml::VersioningConfigurationDocument = quick_xml::de::from_str(&body)
            .map_err(|e| StoreError::from(e).into_generic("versioning_status"))?;

        Ok(match config.status.as_deref() {
            Some("Enabled") => VersioningStatus::Enabled,
            Some("Suspended") => VersioningStatus::Suspended,
            _ => VersioningStatus::Unversioned,
        })
    }
}
