use chrono::{DateTime, Utc};

use crate::domain::models::acl::CannedAcl;
use crate::domain::value_objects::{ObjectKey, VersionId};

/// Storage classes accepted on upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    /// Default class for frequently accessed data
    Standard,
    /// Infrequently used data that must still be retrieved quickly
    StandardIa,
    /// Like StandardIa but stored in a single availability zone
    OnezoneIa,
    /// Frequently used, easily reproducible data
    ReducedRedundancy,
}

impl StorageClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageClass::Standard => "STANDARD",
            StorageClass::StandardIa => "STANDARD_IA",
            StorageClass::OnezoneIa => "ONEZONE_IA",
            StorageClass::ReducedRedundancy => "REDUCED_REDUNDANCY",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "STANDARD" => Some(StorageClass::Standard),
            "STANDARD_IA" => Some(StorageClass::StandardIa),
            "ONEZONE_IA" => Some(StorageClass::OnezoneIa),
            "REDUCED_REDUNDANCY" => Some(StorageClass::ReducedRedundancy),
            _ => None,
        }
    }
}

impl std::fmt::Display for StorageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StorageClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown storage class: {}", s))
    }
}

/// Server-side encryption algorithms accepted on upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerSideEncryption {
    Aes256,
}

impl ServerSideEncryption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerSideEncryption::Aes256 => "AES256",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "AES256" => Some(ServerSideEncryption::Aes256),
            _ => None,
        }
    }
}

impl std::fmt::Display for ServerSideEncryption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ServerSideEncryption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown encryption algorithm: {}", s))
    }
}

/// Optional attributes attached to an upload
#[derive(Debug, Clone, Default)]
pub struct PutObjectOptions {
    pub acl: Option<CannedAcl>,
    pub server_side_encryption: Option<ServerSideEncryption>,
    pub storage_class: Option<StorageClass>,
    pub content_type: Option<String>,
}

impl PutObjectOptions {
    pub fn with_acl(mut self, acl: CannedAcl) -> Self {
        self.acl = Some(acl);
        self
    }

    pub fn with_encryption(mut self, sse: ServerSideEncryption) -> Self {
        self.server_side_encryption = Some(sse);
        self
    }

    pub fn with_storage_class(mut self, class: StorageClass) -> Self {
        self.storage_class = Some(class);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Metadata about a stored object, as reported by the service
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMetadata {
    pub content_type: Option<String>,
    pub content_length: u64,
    pub etag: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub storage_class: Option<StorageClass>,
    pub server_side_encryption: Option<ServerSideEncryption>,
    pub version_id: Option<VersionId>,
}

/// A lightweight entry in an object listing
#[derive(Debug, Clone)]
pub struct ObjectSummary {
    pub key: ObjectKey,
    pub size: u64,
    pub etag: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub storage_class: Option<StorageClass>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_class_round_trips_through_str() {
        for class in [
            StorageClass::Standard,
            StorageClass::StandardIa,
            StorageClass::OnezoneIa,
            StorageClass::ReducedRedundancy,
        ] {
            assert_eq!(StorageClass::parse(class.as_str()), Some(class));
        }
        assert_eq!(StorageClass::parse("GLACIER"), None);
    }

    #[test]
    fn put_options_compose() {
        let options = PutObjectOptions::default()
            .with_acl(CannedAcl::PublicRead)
            .with_encryption(ServerSideEncryption::Aes256)
            .with_storage_class(StorageClass::StandardIa);

        assert_eq!(options.acl, Some(CannedAcl::PublicRead));
        assert_eq!(
            options.server_side_encryption,
            Some(ServerSideEncryption::Aes256)
        );
        assert_eq!(options.storage_class, Some(StorageClass::StandardIa));
        assert!(options.content_type.is_none());
    }
}
