use chrono::{DateTime, Utc};

use crate::domain::value_objects::{ObjectKey, VersionId};

/// Information about a single object version
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectVersionInfo {
    pub key: ObjectKey,
    pub version_id: VersionId,
    pub is_latest: bool,
    /// True for the tombstone entries a versioned delete leaves behind
    pub is_delete_marker: bool,
    pub last_modified: Option<DateTime<Utc>>,
    pub size: u64,
    pub etag: Option<String>,
}

/// Reference to an object (optionally a specific version) for deletion
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectIdentifier {
    pub key: ObjectKey,
    pub version_id: Option<VersionId>,
}

impl ObjectIdentifier {
    pub fn latest(key: ObjectKey) -> Self {
        Self {
            key,
            version_id: None,
        }
    }

    pub fn version(key: ObjectKey, version_id: VersionId) -> Self {
        Self {
            key,
            version_id: Some(version_id),
        }
    }
}

impl From<&ObjectVersionInfo> for ObjectIdentifier {
    fn from(info: &ObjectVersionInfo) -> Self {
        Self {
            key: info.key.clone(),
            version_id: Some(info.version_id.clone()),
        }
    }
}
