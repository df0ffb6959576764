use object_store_client::{
    BucketStore, ServerSideEncryption, StorageClass, VersioningStatus, create_in_memory_app,
    walkthrough::{self, WalkthroughOptions},
};

#[tokio::test]
async fn full_walkthrough_against_in_memory_backend() {
    let deps = create_in_memory_app().await.unwrap();

    let options = WalkthroughOptions {
        first_bucket_prefix: "wt-first-".to_string(),
        second_bucket_prefix: "wt-second-".to_string(),
        work_dir: std::env::temp_dir(),
        file_token_len: 6,
    };

    let report = walkthrough::run(&deps, &options).await.unwrap();

    assert!(report.first_bucket.as_str().starts_with("wt-first-"));
    assert!(report.second_bucket.as_str().starts_with("wt-second-"));
    assert!(report.round_trip_ok);

    // ACL flip was observable on both reads
    assert!(report.acl_was_public);
    assert!(report.acl_now_private);

    // The re-upload carried encryption and the colder storage class
    assert_eq!(report.encryption_observed, Some(ServerSideEncryption::Aes256));
    assert_eq!(report.storage_class_observed, Some(StorageClass::StandardIa));

    // Versioning produced two addressable versions of the first key
    assert_eq!(report.versioning_status, VersioningStatus::Enabled);
    assert_eq!(report.distinct_version_ids, 2);
    assert!(report.latest_version_id.is_some());

    // Both demo buckets were visible while the tour ran
    assert_eq!(report.buckets_seen, 2);
    assert!(report.objects_seen >= 2);
    assert!(report.versions_seen > report.objects_seen);

    // Teardown left nothing behind
    assert!(deps.bucket_store.list_buckets().await.unwrap().is_empty());
}

#[tokio::test]
async fn walkthrough_runs_are_isolated() {
    let deps = create_in_memory_app().await.unwrap();

    let options = WalkthroughOptions {
        first_bucket_prefix: "iso-first-".to_string(),
        second_bucket_prefix: "iso-second-".to_string(),
        ..WalkthroughOptions::default()
    };

    let first = walkthrough::run(&deps, &options).await.unwrap();
    let second = walkthrough::run(&deps, &options).await.unwrap();

    // Generated names never repeat across runs
    assert_ne!(first.first_bucket, second.first_bucket);
    assert_ne!(first.second_bucket, second.second_bucket);

    assert!(deps.bucket_store.list_buckets().await.unwrap().is_empty());
}
