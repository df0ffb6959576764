pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;
pub mod walkthrough;

// Re-export key types for convenience

// Domain types - core entities and value objects
pub use domain::{
    AccessControlList,
    // Value objects
    BucketName,
    BucketSummary,
    CannedAcl,
    DomainValidationError,
    Grant,
    Grantee,
    ObjectIdentifier,
    // Models
    ObjectKey,
    ObjectMetadata,
    ObjectSummary,
    ObjectVersionInfo,
    Permission,
    PutObjectOptions,
    ServerSideEncryption,
    StorageClass,
    // Errors
    StorageError,
    VersionId,
    VersioningStatus,
};

// Port types - interfaces for the external service and local transfers
pub use ports::{BucketStore, ObjectStore, TransferService};

// Service implementations
pub use services::TransferServiceImpl;

// Application factory and configuration
pub use app::{
    AppBuilder, AppConfig, AppDependencies, AppError, StorageBackend, create_app_from_env,
    create_in_memory_app, create_minio_app, create_s3_app,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{InMemoryStorageAdapter, S3Client, S3Config, S3StorageAdapter};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        AppBuilder, AppDependencies, BucketName, BucketStore, CannedAcl, InMemoryStorageAdapter,
        ObjectKey, ObjectStore, PutObjectOptions, S3StorageAdapter, ServerSideEncryption,
        StorageClass, TransferService, TransferServiceImpl, VersionId, VersioningStatus,
        create_app_from_env, create_in_memory_app, create_minio_app, create_s3_app,
    };
}
