use bytes::Bytes;
use object_store_client::{
    BucketName, BucketStore, CannedAcl, ObjectKey, ObjectStore, Permission, PutObjectOptions,
    StorageError, create_in_memory_app,
};

#[tokio::test]
async fn upload_acl_is_readable() {
    let deps = create_in_memory_app().await.unwrap();

    let bucket = BucketName::new("acl-bucket".to_string()).unwrap();
    deps.bucket_store.create_bucket(&bucket).await.unwrap();

    let key = ObjectKey::new("shared.txt".to_string()).unwrap();
    deps.object_store
        .put_object(
            &bucket,
            &key,
            Bytes::from("shared"),
            &PutObjectOptions::default().with_acl(CannedAcl::PublicRead),
        )
        .await
        .unwrap();

    let acl = deps.object_store.get_object_acl(&bucket, &key).await.unwrap();
    assert!(acl.is_public_read());
    assert!(acl.owner_id.is_some());
    assert!(
        acl.grants
            .iter()
            .any(|grant| grant.permission == Permission::FullControl)
    );
}

#[tokio::test]
async fn public_then_private_round_trip() {
    let deps = create_in_memory_app().await.unwrap();

    let bucket = BucketName::new("acl-bucket".to_string()).unwrap();
    deps.bucket_store.create_bucket(&bucket).await.unwrap();

    let key = ObjectKey::new("toggled.txt".to_string()).unwrap();
    deps.object_store
        .put_object(
            &bucket,
            &key,
            Bytes::from("toggled"),
            &PutObjectOptions::default().with_acl(CannedAcl::PublicRead),
        )
        .await
        .unwrap();

    let before = deps.object_store.get_object_acl(&bucket, &key).await.unwrap();
    assert!(before.is_public_read());

    deps.object_store
        .put_object_acl(&bucket, &key, CannedAcl::Private)
        .await
        .unwrap();

    let after = deps.object_store.get_object_acl(&bucket, &key).await.unwrap();
    assert!(!after.is_public_read());
    assert!(after.grants.len() < before.grants.len());
}

#[tokio::test]
async fn default_upload_is_private() {
    let deps = create_in_memory_app().await.unwrap();

    let bucket = BucketName::new("acl-bucket".to_string()).unwrap();
    deps.bucket_store.create_bucket(&bucket).await.unwrap();

    let key = ObjectKey::new("quiet.txt".to_string()).unwrap();
    deps.object_store
        .put_object(&bucket, &key, Bytes::from("quiet"), &PutObjectOptions::default())
        .await
        .unwrap();

    let acl = deps.object_store.get_object_acl(&bucket, &key).await.unwrap();
    assert!(!acl.is_public_read());
    assert_eq!(acl.grants.len(), 1);
}

#[tokio::test]
async fn acl_of_missing_object_fails() {
    let deps = create_in_memory_app().await.unwrap();

    let bucket = BucketName::new("acl-bucket".to_string()).unwrap();
    deps.bucket_store.create_bucket(&bucket).await.unwrap();

    let key = ObjectKey::new("ghost.txt".to_string()).unwrap();
    assert!(matches!(
        deps.object_store.get_object_acl(&bucket, &key).await,
        Err(StorageError::ObjectNotFound { .. })
    ));
}
