use crate::domain::value_objects::{BucketName, ObjectKey, VersionId};

/// Errors that can occur during storage operations
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Bucket not found
    BucketNotFound { bucket: BucketName },

    /// Bucket already exists (bucket names are globally scoped)
    BucketAlreadyExists { bucket: BucketName },

    /// Bucket still contains objects or versions
    BucketNotEmpty { bucket: BucketName },

    /// Object not found
    ObjectNotFound { bucket: BucketName, key: ObjectKey },

    /// Version not found
    VersionNotFound {
        bucket: BucketName,
        key: ObjectKey,
        version_id: VersionId,
    },

    /// Access denied by the service
    AccessDenied { operation: String },

    /// Request rejected before reaching the service
    ValidationError { message: String },

    /// Transport-level failure (connection, timeout, DNS)
    TransportError { message: String },

    /// Any other error reported by the storage service
    ServiceError {
        code: Option<String>,
        message: String,
    },
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::BucketNotFound { bucket } => {
                write!(f, "Bucket not found: {}", bucket)
            }
            StorageError::BucketAlreadyExists { bucket } => {
                write!(f, "Bucket already exists: {}", bucket)
            }
            StorageError::BucketNotEmpty { bucket } => {
                write!(
                    f,
                    "Bucket '{}' is not empty; delete all objects and versions first",
                    bucket
                )
            }
            StorageError::ObjectNotFound { bucket, key } => {
                write!(f, "Object not found: {}/{}", bucket, key)
            }
            StorageError::VersionNotFound {
                bucket,
                key,
                version_id,
            } => {
                write!(
                    f,
                    "Version '{}' not found for object {}/{}",
                    version_id, bucket, key
                )
            }
            StorageError::AccessDenied { operation } => {
                write!(f, "Access denied for operation '{}'", operation)
            }
            StorageError::ValidationError { message } => {
                write!(f, "Validation error: {}", message)
            }
            StorageError::TransportError { message } => {
                write!(f, "Transport error: {}", message)
            }
            StorageError::ServiceError { code, message } => match code {
                Some(code) => write!(f, "Service error ({}): {}", code, message),
                None => write!(f, "Service error: {}", message),
            },
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
