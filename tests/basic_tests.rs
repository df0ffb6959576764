use bytes::Bytes;
use object_store_client::{
    BucketName, BucketStore, ObjectKey, ObjectStore, PutObjectOptions, StorageError,
    create_in_memory_app,
};

#[tokio::test]
async fn basic_put_get() {
    let deps = create_in_memory_app().await.unwrap();

    let bucket = BucketName::new("basic-bucket".to_string()).unwrap();
    deps.bucket_store.create_bucket(&bucket).await.unwrap();

    let key = ObjectKey::new("test.txt".to_string()).unwrap();
    let data = Bytes::from("hello world");

    let metadata = deps
        .object_store
        .put_object(
            &bucket,
            &key,
            data.clone(),
            &PutObjectOptions::default().with_content_type("text/plain"),
        )
        .await
        .unwrap();

    assert_eq!(metadata.content_length, data.len() as u64);
    assert_eq!(metadata.content_type.as_deref(), Some("text/plain"));
    assert!(metadata.etag.is_some());

    let fetched = deps.object_store.get_object(&bucket, &key).await.unwrap();
    assert_eq!(fetched, data);
}

#[tokio::test]
async fn round_trip_is_byte_identical() {
    let deps = create_in_memory_app().await.unwrap();

    let bucket = BucketName::new("round-trip-bucket".to_string()).unwrap();
    deps.bucket_store.create_bucket(&bucket).await.unwrap();

    let key = ObjectKey::new("payload.bin".to_string()).unwrap();
    let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

    deps.object_store
        .put_object(&bucket, &key, Bytes::from(data.clone()), &PutObjectOptions::default())
        .await
        .unwrap();

    let fetched = deps.object_store.get_object(&bucket, &key).await.unwrap();
    assert_eq!(fetched.as_ref(), data.as_slice());
}

#[tokio::test]
async fn basic_delete() {
    let deps = create_in_memory_app().await.unwrap();

    let bucket = BucketName::new("delete-bucket".to_string()).unwrap();
    deps.bucket_store.create_bucket(&bucket).await.unwrap();

    let key = ObjectKey::new("to_delete.txt".to_string()).unwrap();
    deps.object_store
        .put_object(&bucket, &key, Bytes::from("delete me"), &PutObjectOptions::default())
        .await
        .unwrap();

    assert!(deps.object_store.get_object(&bucket, &key).await.is_ok());

    deps.object_store.delete_object(&bucket, &key).await.unwrap();

    assert!(matches!(
        deps.object_store.get_object(&bucket, &key).await,
        Err(StorageError::ObjectNotFound { .. })
    ));
}

#[tokio::test]
async fn get_from_missing_bucket_fails() {
    let deps = create_in_memory_app().await.unwrap();

    let bucket = BucketName::new("never-created".to_string()).unwrap();
    let key = ObjectKey::new("anything.txt".to_string()).unwrap();

    assert!(matches!(
        deps.object_store.get_object(&bucket, &key).await,
        Err(StorageError::BucketNotFound { .. })
    ));
}

#[tokio::test]
async fn head_reports_upload_attributes() {
    use object_store_client::{ServerSideEncryption, StorageClass};

    let deps = create_in_memory_app().await.unwrap();

    let bucket = BucketName::new("head-bucket".to_string()).unwrap();
    deps.bucket_store.create_bucket(&bucket).await.unwrap();

    let key = ObjectKey::new("encrypted.txt".to_string()).unwrap();
    deps.object_store
        .put_object(
            &bucket,
            &key,
            Bytes::from("secret"),
            &PutObjectOptions::default()
                .with_encryption(ServerSideEncryption::Aes256)
                .with_storage_class(StorageClass::StandardIa),
        )
        .await
        .unwrap();

    let metadata = deps.object_store.head_object(&bucket, &key).await.unwrap();
    assert_eq!(
        metadata.server_side_encryption,
        Some(ServerSideEncryption::Aes256)
    );
    assert_eq!(metadata.storage_class, Some(StorageClass::StandardIa));
    assert_eq!(metadata.content_length, 6);
}

#[tokio::test]
async fn copy_between_buckets_server_side() {
    let deps = create_in_memory_app().await.unwrap();

    let source = BucketName::new("copy-source".to_string()).unwrap();
    let dest = BucketName::new("copy-dest".to_string()).unwrap();
    deps.bucket_store.create_bucket(&source).await.unwrap();
    deps.bucket_store.create_bucket(&dest).await.unwrap();

    let key = ObjectKey::new("shared.txt".to_string()).unwrap();
    let data = Bytes::from("copied content");
    deps.object_store
        .put_object(&source, &key, data.clone(), &PutObjectOptions::default())
        .await
        .unwrap();

    deps.object_store
        .copy_object(&source, &key, &dest, &key)
        .await
        .unwrap();

    let fetched = deps.object_store.get_object(&dest, &key).await.unwrap();
    assert_eq!(fetched, data);

    // The source is untouched
    assert!(deps.object_store.get_object(&source, &key).await.is_ok());
}

#[tokio::test]
async fn copy_of_missing_object_fails() {
    let deps = create_in_memory_app().await.unwrap();

    let source = BucketName::new("copy-source".to_string()).unwrap();
    let dest = BucketName::new("copy-dest".to_string()).unwrap();
    deps.bucket_store.create_bucket(&source).await.unwrap();
    deps.bucket_store.create_bucket(&dest).await.unwrap();

    let key = ObjectKey::new("ghost.txt".to_string()).unwrap();
    assert!(matches!(
        deps.object_store.copy_object(&source, &key, &dest, &key).await,
        Err(StorageError::ObjectNotFound { .. })
    ));
}
