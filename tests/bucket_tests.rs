use bytes::Bytes;
use object_store_client::{
    BucketName, BucketStore, ObjectKey, ObjectStore, PutObjectOptions, StorageError,
    create_in_memory_app,
};

#[tokio::test]
async fn create_list_delete_bucket() {
    let deps = create_in_memory_app().await.unwrap();

    let bucket = BucketName::new("lifecycle-bucket".to_string()).unwrap();
    assert!(!deps.bucket_store.bucket_exists(&bucket).await.unwrap());

    deps.bucket_store.create_bucket(&bucket).await.unwrap();
    assert!(deps.bucket_store.bucket_exists(&bucket).await.unwrap());

    let buckets = deps.bucket_store.list_buckets().await.unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].name, bucket);
    assert!(buckets[0].creation_date.is_some());

    deps.bucket_store.delete_bucket(&bucket).await.unwrap();
    assert!(!deps.bucket_store.bucket_exists(&bucket).await.unwrap());
}

#[tokio::test]
async fn duplicate_create_conflicts() {
    let deps = create_in_memory_app().await.unwrap();

    let bucket = BucketName::new("taken-bucket".to_string()).unwrap();
    deps.bucket_store.create_bucket(&bucket).await.unwrap();

    assert!(matches!(
        deps.bucket_store.create_bucket(&bucket).await,
        Err(StorageError::BucketAlreadyExists { .. })
    ));
}

#[tokio::test]
async fn non_empty_bucket_refuses_deletion() {
    let deps = create_in_memory_app().await.unwrap();

    let bucket = BucketName::new("occupied-bucket".to_string()).unwrap();
    deps.bucket_store.create_bucket(&bucket).await.unwrap();

    let key = ObjectKey::new("occupant.txt".to_string()).unwrap();
    deps.object_store
        .put_object(&bucket, &key, Bytes::from("here"), &PutObjectOptions::default())
        .await
        .unwrap();

    assert!(matches!(
        deps.bucket_store.delete_bucket(&bucket).await,
        Err(StorageError::BucketNotEmpty { .. })
    ));

    // Emptying the bucket unblocks deletion
    deps.object_store.delete_object(&bucket, &key).await.unwrap();
    deps.bucket_store.delete_bucket(&bucket).await.unwrap();
}

#[tokio::test]
async fn generated_bucket_names_are_unique_and_valid() {
    let deps = create_in_memory_app().await.unwrap();

    let first = BucketName::generate("demo-bucket-").unwrap();
    let second = BucketName::generate("demo-bucket-").unwrap();
    assert_ne!(first, second);
    assert!(first.as_str().len() <= 63);

    // Both are usable as-is against the service
    deps.bucket_store.create_bucket(&first).await.unwrap();
    deps.bucket_store.create_bucket(&second).await.unwrap();

    let buckets = deps.bucket_store.list_buckets().await.unwrap();
    assert_eq!(buckets.len(), 2);
}

#[tokio::test]
async fn delete_of_missing_bucket_fails() {
    let deps = create_in_memory_app().await.unwrap();

    let bucket = BucketName::new("never-existed".to_string()).unwrap();
    assert!(matches!(
        deps.bucket_store.delete_bucket(&bucket).await,
        Err(StorageError::BucketNotFound { .. })
    ));
}
