// Infrastructure error types
pub mod error;

// Storage implementations
pub mod memory;
pub mod s3;

// Re-export key types
pub use error::StoreError;
pub use memory::InMemoryStorageAdapter;
pub use s3::{S3Client, S3Config, S3StorageAdapter};
