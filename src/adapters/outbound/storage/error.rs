use crate::domain::{
    errors::StorageError,
    value_objects::{BucketName, ObjectKey, VersionId},
};
use std::io;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Request signing error: {0}")]
    Signing(String),

    #[error("Service error: {status} - {message}")]
    Service {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("{0}")]
    Other(String),
}

impl From<quick_xml::DeError> for StoreError {
    fn from(err: quick_xml::DeError) -> Self {
        StoreError::Xml(err.to_string())
    }
}

impl StoreError {
    /// The S3 error code reported by the service, if any
    pub fn service_code(&self) -> Option<&str> {
        match self {
            StoreError::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    fn service_status(&self) -> Option<u16> {
        match self {
            StoreError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Map into a domain error for a bucket-level operation
    pub fn into_bucket_error(self, bucket: &BucketName, operation: &str) -> StorageError {
        match self.service_code() {
            Some("NoSuchBucket") => {
                return StorageError::BucketNotFound {
                    bucket: bucket.clone(),
                };
            }
            Some("BucketAlreadyExists") | Some("BucketAlreadyOwnedByYou") => {
                return StorageError::BucketAlreadyExists {
                    bucket: bucket.clone(),
                };
            }
            Some("BucketNotEmpty") => {
                return StorageError::BucketNotEmpty {
                    bucket: bucket.clone(),
                };
            }
            Some("AccessDenied") => {
                return StorageError::AccessDenied {
                    operation: operation.to_string(),
                };
            }
            _ => {}
        }

        if self.service_status() == Some(404) {
            return StorageError::BucketNotFound {
                bucket: bucket.clone(),
            };
        }

        self.into_generic(operation)
    }

    /// Map into a domain error for an object-level operation
    pub fn into_object_error(
        self,
        bucket: &BucketName,
        key: &ObjectKey,
        version_id: Option<&VersionId>,
        operation: &str,
    ) -> StorageError {
        match self.service_code() {
            Some("NoSuchBucket") => {
                return StorageError::BucketNotFound {
                    bucket: bucket.clone(),
                };
            }
            Some("NoSuchKey") => {
                return StorageError::ObjectNotFound {
                    bucket: bucket.clone(),
                    key: key.clone(),
                };
            }
            Some("NoSuchVersion") => {
                if let Some(version_id) = version_id {
                    return StorageError::VersionNotFound {
                        bucket: bucket.clone(),
                        key: key.clone(),
                        version_id: version_id.clone(),
                    };
                }
            }
            Some("AccessDenied") => {
                return StorageError::AccessDenied {
                    operation: operation.to_string(),
                };
            }
            _ => {}
        }

        if self.service_status() == Some(404) {
            return StorageError::ObjectNotFound {
                bucket: bucket.clone(),
                key: key.clone(),
            };
        }

        self.into_generic(operation)
    }

    /// Map into a domain error when no bucket/object context applies
    pub fn into_generic(self, operation: &str) -> StorageError {
        match self {
            StoreError::Transport(err) => StorageError::TransportError {
                message: err.to_string(),
            },
            StoreError::Io(err) => StorageError::TransportError {
                message: err.to_string(),
            },
            StoreError::Service {
                code,
                message,
                status,
            } => StorageError::ServiceError {
                code,
                message: format!("{} (HTTP {}, during {})", message, status, operation),
            },
            other => StorageError::ServiceError {
                code: None,
                message: format!("{} (during {})", other, operation),
            },
        }
    }
}

/// Convert object_store errors to domain storage errors.
///
/// Used by the in-memory adapter, which keeps payloads in an
/// `object_store::memory::InMemory`.
pub fn object_store_error(
    err: object_store::Error,
    bucket: &BucketName,
    key: &ObjectKey,
) -> StorageError {
    match err {
        object_store::Error::NotFound { .. } => StorageError::ObjectNotFound {
            bucket: bucket.clone(),
            key: key.clone(),
        },
        other => StorageError::ServiceError {
            code: None,
            message: format!("object store backend: {}", other),
        },
    }
}
