//! A guided tour of the storage surface.
//!
//! Runs the demonstration sequence end to end against whichever backend the
//! application was built with: bucket creation, fixture uploads with ACL,
//! encryption and storage-class attributes, download, server-side copy,
//! versioning, enumeration, and a full teardown. Strictly sequential; every
//! step blocks on the previous one and any failure aborts the tour.

pub mod fixtures;

use anyhow::Context;
use std::path::PathBuf;
use tracing::info;

use crate::{
    app::AppDependencies,
    domain::{
        errors::StorageResult,
        models::{
            CannedAcl, ObjectIdentifier, PutObjectOptions, ServerSideEncryption, StorageClass,
            VersioningStatus,
        },
        naming,
        value_objects::{BucketName, ObjectKey, VersionId},
    },
    ports::{
        services::TransferService,
        storage::{BucketStore, ObjectStore},
    },
};

/// Tunables for a walkthrough run
#[derive(Debug, Clone)]
pub struct WalkthroughOptions {
    pub first_bucket_prefix: String,
    pub second_bucket_prefix: String,
    /// Directory for local fixture files
    pub work_dir: PathBuf,
    /// Truncation length for fixture-name tokens
    pub file_token_len: usize,
}

impl Default for WalkthroughOptions {
    fn default() -> Self {
        Self {
            first_bucket_prefix: "first-demo-bucket-".to_string(),
            second_bucket_prefix: "second-demo-bucket-".to_string(),
            work_dir: std::env::temp_dir(),
            file_token_len: naming::DEFAULT_FILE_TOKEN_LEN,
        }
    }
}

/// What the tour observed, for display and assertions
#[derive(Debug)]
pub struct WalkthroughReport {
    pub first_bucket: BucketName,
    pub second_bucket: BucketName,
    pub round_trip_ok: bool,
    pub acl_was_public: bool,
    pub acl_now_private: bool,
    pub encryption_observed: Option<ServerSideEncryption>,
    pub storage_class_observed: Option<StorageClass>,
    pub versioning_status: VersioningStatus,
    pub distinct_version_ids: usize,
    pub latest_version_id: Option<VersionId>,
    pub buckets_seen: usize,
    pub objects_seen: usize,
    pub versions_seen: usize,
}

/// Delete every object version in a bucket, then the bucket itself.
///
/// The service refuses to delete a non-empty bucket, so versions go first.
pub async fn purge_bucket(deps: &AppDependencies, bucket: &BucketName) -> StorageResult<()> {
    let versions = deps.object_store.list_object_versions(bucket).await?;
    let identifiers: Vec<ObjectIdentifier> = versions.iter().map(ObjectIdentifier::from).collect();

    info!(bucket = %bucket, versions = identifiers.len(), "purging bucket");
    deps.object_store.delete_objects(bucket, &identifiers).await?;
    deps.bucket_store.delete_bucket(bucket).await
}

/// Run the full demonstration sequence
pub async fn run(
    deps: &AppDependencies,
    options: &WalkthroughOptions,
) -> anyhow::Result<WalkthroughReport> {
    // Two buckets with freshly generated globally unique names
    let first_bucket = BucketName::generate(&options.first_bucket_prefix)?;
    let second_bucket = BucketName::generate(&options.second_bucket_prefix)?;

    info!(bucket = %first_bucket, "creating first bucket");
    deps.bucket_store.create_bucket(&first_bucket).await?;

    // A fixture file, uploaded plain and fetched straight back
    let first_path = fixtures::create_temp_file(
        &options.work_dir,
        300,
        "firstfile.txt",
        "f",
        options.file_token_len,
    )
    .await
    .context("creating first fixture file")?;
    let first_key = ObjectKey::new(
        first_path
            .file_name()
            .and_then(|name| name.to_str())
            .context("fixture path has no file name")?
            .to_string(),
    )?;

    info!(key = %first_key, "uploading first file");
    deps.transfer_service
        .upload_file(&first_path, &first_bucket, &first_key, &PutObjectOptions::default())
        .await?;

    let download_path = options.work_dir.join(format!("download-{}", first_key));
    deps.transfer_service
        .download_file(&first_bucket, &first_key, &download_path)
        .await?;
    let round_trip_ok = tokio::fs::read(&first_path).await? == tokio::fs::read(&download_path).await?;
    info!(round_trip_ok, "download round trip checked");

    info!(bucket = %second_bucket, "creating second bucket");
    deps.bucket_store.create_bucket(&second_bucket).await?;

    // Upload with a public-read ACL, inspect the grants, then flip it private
    let second_path = fixtures::create_temp_file(
        &options.work_dir,
        400,
        "secondfile.txt",
        "s",
        options.file_token_len,
    )
    .await
    .context("creating second fixture file")?;
    let second_key = ObjectKey::new(
        second_path
            .file_name()
            .and_then(|name| name.to_str())
            .context("fixture path has no file name")?
            .to_string(),
    )?;

    info!(key = %second_key, "uploading second file with public-read ACL");
    deps.transfer_service
        .upload_file(
            &second_path,
            &first_bucket,
            &second_key,
            &PutObjectOptions::default().with_acl(CannedAcl::PublicRead),
        )
        .await?;

    let acl = deps.object_store.get_object_acl(&first_bucket, &second_key).await?;
    let acl_was_public = acl.is_public_read();
    info!(grants = acl.grants.len(), public = acl_was_public, "grants before");

    deps.object_store
        .put_object_acl(&first_bucket, &second_key, CannedAcl::Private)
        .await?;
    let acl = deps.object_store.get_object_acl(&first_bucket, &second_key).await?;
    let acl_now_private = !acl.is_public_read();
    info!(grants = acl.grants.len(), private = acl_now_private, "grants after");

    // Server-side copy between buckets, then delete the copy
    info!(key = %first_key, "copying between buckets server-side");
    deps.object_store
        .copy_object(&first_bucket, &first_key, &second_bucket, &first_key)
        .await?;
    deps.object_store.delete_object(&second_bucket, &first_key).await?;

    // Encrypted upload, then the same key again with a colder storage class
    let third_path = fixtures::create_temp_file(
        &options.work_dir,
        300,
        "thirdfile.txt",
        "t",
        options.file_token_len,
    )
    .await
    .context("creating third fixture file")?;
    let third_key = ObjectKey::new(
        third_path
            .file_name()
            .and_then(|name| name.to_str())
            .context("fixture path has no file name")?
            .to_string(),
    )?;

    info!(key = %third_key, "uploading with server-side encryption");
    deps.transfer_service
        .upload_file(
            &third_path,
            &first_bucket,
            &third_key,
            &PutObjectOptions::default().with_encryption(ServerSideEncryption::Aes256),
        )
        .await?;

    info!(key = %third_key, "re-uploading with STANDARD_IA storage class");
    deps.transfer_service
        .upload_file(
            &third_path,
            &first_bucket,
            &third_key,
            &PutObjectOptions::default()
                .with_encryption(ServerSideEncryption::Aes256)
                .with_storage_class(StorageClass::StandardIa),
        )
        .await?;

    let metadata = deps.object_store.head_object(&first_bucket, &third_key).await?;
    let encryption_observed = metadata.server_side_encryption;
    let storage_class_observed = metadata.storage_class;
    info!(
        encryption = ?encryption_observed,
        storage_class = ?storage_class_observed,
        "attributes after re-upload"
    );

    // Versioning: enable, write the same key twice, observe distinct versions
    info!(bucket = %first_bucket, "enabling versioning");
    deps.bucket_store.enable_versioning(&first_bucket).await?;
    let versioning_status = deps.bucket_store.versioning_status(&first_bucket).await?;
    info!(status = %versioning_status, "versioning status");

    let first_revision = deps
        .transfer_service
        .upload_file(&first_path, &first_bucket, &first_key, &PutObjectOptions::default())
        .await?
        .version_id;
    let second_revision = deps
        .transfer_service
        .upload_file(&third_path, &first_bucket, &first_key, &PutObjectOptions::default())
        .await?
        .version_id;

    let latest_version_id = deps
        .object_store
        .head_object(&first_bucket, &first_key)
        .await?
        .version_id;
    info!(version = ?latest_version_id, "latest version of first key");

    let distinct_version_ids = [&first_revision, &second_revision]
        .iter()
        .filter_map(|version| version.as_ref())
        .collect::<std::collections::HashSet<_>>()
        .len();

    let versions = deps.object_store.list_object_versions(&first_bucket).await?;

    // Enumerate everything once before tearing down
    let buckets_seen = deps.bucket_store.list_buckets().await?.len();
    let objects_seen = deps.object_store.list_objects(&first_bucket).await?.len();
    let versions_seen = versions.len();
    info!(buckets_seen, objects_seen, versions_seen, "enumeration complete");

    // Teardown: versions first, then the empty buckets
    purge_bucket(deps, &first_bucket).await?;

    deps.transfer_service
        .upload_file(&first_path, &second_bucket, &first_key, &PutObjectOptions::default())
        .await?;
    purge_bucket(deps, &second_bucket).await?;

    for path in [&first_path, &second_path, &third_path, &download_path] {
        tokio::fs::remove_file(path).await.ok();
    }

    Ok(WalkthroughReport {
        first_bucket,
        second_bucket,
        round_trip_ok,
        acl_was_public,
        acl_now_private,
        encryption_observed,
        storage_class_observed,
        versioning_status,
        distinct_version_ids,
        latest_version_id,
        buckets_seen,
        objects_seen,
        versions_seen,
    })
}
