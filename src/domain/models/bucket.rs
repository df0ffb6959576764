use chrono::{DateTime, Utc};

use crate::domain::value_objects::BucketName;

/// An entry in the bucket listing
#[derive(Debug, Clone)]
pub struct BucketSummary {
    pub name: BucketName,
    pub creation_date: Option<DateTime<Utc>>,
}

/// Versioning state of a bucket.
///
/// The service distinguishes a bucket that never had versioning configured
/// from one where it was enabled and later suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersioningStatus {
    Unversioned,
    Enabled,
    Suspended,
}

impl VersioningStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersioningStatus::Unversioned => "Unversioned",
            VersioningStatus::Enabled => "Enabled",
            VersioningStatus::Suspended => "Suspended",
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, VersioningStatus::Enabled)
    }
}

impl std::fmt::Display for VersioningStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
