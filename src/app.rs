use std::sync::Arc;

use crate::{
    adapters::outbound::storage::{
        InMemoryStorageAdapter, S3Client, S3Config, S3StorageAdapter,
    },
    ports::{
        services::TransferService,
        storage::{BucketStore, ObjectStore},
    },
    services::TransferServiceImpl,
};

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::InMemory,
        }
    }
}

/// Storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    S3 {
        region: String,
        access_key: String,
        secret_key: String,
        session_token: Option<String>,
    },
    MinIO {
        endpoint: String,
        region: String,
        access_key: String,
        secret_key: String,
        use_ssl: bool,
    },
}

/// Application dependencies container
pub struct AppDependencies {
    pub bucket_store: Arc<dyn BucketStore>,
    pub object_store: Arc<dyn ObjectStore>,
    pub transfer_service: Arc<dyn TransferService>,
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    /// Build the application dependencies
    pub async fn build(self) -> Result<AppDependencies, AppError> {
        let (bucket_store, object_store): (Arc<dyn BucketStore>, Arc<dyn ObjectStore>) =
            match &self.config.storage_backend {
                StorageBackend::InMemory => {
                    let adapter = Arc::new(InMemoryStorageAdapter::new());
                    (adapter.clone(), adapter)
                }
                StorageBackend::S3 {
                    region,
                    access_key,
                    secret_key,
                    session_token,
                } => {
                    let mut config =
                        S3Config::aws(region.clone(), access_key.clone(), secret_key.clone());
                    config.session_token = session_token.clone();
                    let client = S3Client::new(config).map_err(|e| AppError::StorageInit {
                        message: e.to_string(),
                    })?;
                    let adapter = Arc::new(S3StorageAdapter::new(client));
                    (adapter.clone(), adapter)
                }
                StorageBackend::MinIO {
                    endpoint,
                    region,
                    access_key,
                    secret_key,
                    use_ssl,
                } => {
                    let config = S3Config {
                        endpoint: endpoint.clone(),
                        region: region.clone(),
                        access_key: access_key.clone(),
                        secret_key: secret_key.clone(),
                        secure: *use_ssl,
                        session_token: None,
                    };
                    let client = S3Client::new(config).map_err(|e| AppError::StorageInit {
                        message: e.to_string(),
                    })?;
                    let adapter = Arc::new(S3StorageAdapter::new(client));
                    (adapter.clone(), adapter)
                }
            };

        let transfer_service = Arc::new(TransferServiceImpl::new(object_store.clone()));

        Ok(AppDependencies {
            bucket_store,
            object_store,
            transfer_service,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },
}

/// Create an in-memory application for testing and local demonstration
pub async fn create_in_memory_app() -> Result<AppDependencies, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory)
        .build()
        .await
}

/// Create a MinIO-backed application
pub async fn create_minio_app(
    endpoint: String,
    region: String,
    access_key: String,
    secret_key: String,
    use_ssl: bool,
) -> Result<AppDependencies, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::MinIO {
            endpoint,
            region,
            access_key,
            secret_key,
            use_ssl,
        })
        .build()
        .await
}

/// Create an S3-backed application
pub async fn create_s3_app(
    region: String,
    access_key: String,
    secret_key: String,
    session_token: Option<String>,
) -> Result<AppDependencies, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::S3 {
            region,
            access_key,
            secret_key,
            session_token,
        })
        .build()
        .await
}

/// Create application from environment variables
pub async fn create_app_from_env() -> Result<AppDependencies, AppError> {
    let storage_backend = match std::env::var("STORAGE_BACKEND").as_deref() {
        Ok("s3") => {
            let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
            let access_key =
                std::env::var("AWS_ACCESS_KEY_ID").map_err(|_| AppError::Configuration {
                    message: "AWS_ACCESS_KEY_ID environment variable required".to_string(),
                })?;
            let secret_key =
                std::env::var("AWS_SECRET_ACCESS_KEY").map_err(|_| AppError::Configuration {
                    message: "AWS_SECRET_ACCESS_KEY environment variable required".to_string(),
                })?;
            let session_token = std::env::var("AWS_SESSION_TOKEN").ok();

            StorageBackend::S3 {
                region,
                access_key,
                secret_key,
                session_token,
            }
        }
        Ok("minio") => {
            let endpoint =
                std::env::var("MINIO_ENDPOINT").map_err(|_| AppError::Configuration {
                    message: "MINIO_ENDPOINT environment variable required".to_string(),
                })?;
            let region = std::env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".to_string());
            let access_key =
                std::env::var("MINIO_ACCESS_KEY").map_err(|_| AppError::Configuration {
                    message: "MINIO_ACCESS_KEY environment variable required".to_string(),
                })?;
            let secret_key =
                std::env::var("MINIO_SECRET_KEY").map_err(|_| AppError::Configuration {
                    message: "MINIO_SECRET_KEY environment variable required".to_string(),
                })?;
            let use_ssl = std::env::var("MINIO_USE_SSL")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false);

            StorageBackend::MinIO {
                endpoint,
                region,
                access_key,
                secret_key,
                use_ssl,
            }
        }
        _ => StorageBackend::InMemory,
    };

    AppBuilder::new()
        .with_storage_backend(storage_backend)
        .build()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_in_memory_app() {
        let deps = create_in_memory_app().await.unwrap();
        assert!(deps.bucket_store.list_buckets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_app_builder_defaults_to_memory() {
        let deps = AppBuilder::new().build().await.unwrap();
        assert!(deps.bucket_store.list_buckets().await.unwrap().is_empty());
    }
}
