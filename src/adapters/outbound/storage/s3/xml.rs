//! Serde mappings for the service's XML documents.
//!
//! Only the fields the adapter reads are declared; everything else in a
//! response is ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parse the ISO-8601 timestamps the service uses in XML bodies
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// ETags arrive wrapped in double quotes; strip them
pub fn trim_etag(value: Option<String>) -> Option<String> {
    value.map(|etag| etag.trim_matches('"').to_string())
}

/// `<Error>` body returned with non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorDocument {
    #[serde(rename = "Code")]
    pub code: Option<String>,
    #[serde(rename = "Message")]
    pub message: Option<String>,
}

/// `GET /` — `<ListAllMyBucketsResult>`
#[derive(Debug, Deserialize)]
pub struct ListAllMyBucketsResult {
    #[serde(rename = "Buckets", default)]
    pub buckets: BucketList,
}

#[derive(Debug, Default, Deserialize)]
pub struct BucketList {
    #[serde(rename = "Bucket", default)]
    pub entries: Vec<BucketEntry>,
}

#[derive(Debug, Deserialize)]
pub struct BucketEntry {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CreationDate")]
    pub creation_date: Option<String>,
}

/// `GET /bucket?list-type=2` — `<ListBucketResult>`
#[derive(Debug, Deserialize)]
pub struct ListBucketResult {
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
    #[serde(rename = "Contents", default)]
    pub contents: Vec<ObjectEntry>,
    #[serde(rename = "NextContinuationToken")]
    pub next_continuation_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ObjectEntry {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "LastModified")]
    pub last_modified: Option<String>,
    #[serde(rename = "ETag")]
    pub etag: Option<String>,
    #[serde(rename = "Size", default)]
    pub size: u64,
    #[serde(rename = "StorageClass")]
    pub storage_class: Option<String>,
}

/// `GET /bucket?versions` — `<ListVersionsResult>`
#[derive(Debug, Deserialize)]
pub struct ListVersionsResult {
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
    #[serde(rename = "Version", default)]
    pub versions: Vec<VersionEntry>,
    #[serde(rename = "DeleteMarker", default)]
    pub delete_markers: Vec<DeleteMarkerEntry>,
    #[serde(rename = "NextKeyMarker")]
    pub next_key_marker: Option<String>,
    #[serde(rename = "NextVersionIdMarker")]
    pub next_version_id_marker: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VersionEntry {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "VersionId")]
    pub version_id: String,
    #[serde(rename = "IsLatest", default)]
    pub is_latest: bool,
    #[serde(rename = "LastModified")]
    pub last_modified: Option<String>,
    #[serde(rename = "ETag")]
    pub etag: Option<String>,
    #[serde(rename = "Size", default)]
    pub size: u64,
}

#[derive(Debug, Deserialize)]
pub struct DeleteMarkerEntry {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "VersionId")]
    pub version_id: String,
    #[serde(rename = "IsLatest", default)]
    pub is_latest: bool,
    #[serde(rename = "LastModified")]
    pub last_modified: Option<String>,
}

/// `GET /bucket?versioning` — `<VersioningConfiguration>`
#[derive(Debug, Deserialize)]
pub struct VersioningConfigurationDocument {
    #[serde(rename = "Status")]
    pub status: Option<String>,
}

/// `GET /bucket/key?acl` — `<AccessControlPolicy>`
#[derive(Debug, Deserialize)]
pub struct AccessControlPolicy {
    #[serde(rename = "Owner")]
    pub owner: Option<OwnerEntry>,
    #[serde(rename = "AccessControlList", default)]
    pub access_control_list: GrantList,
}

#[derive(Debug, Deserialize)]
pub struct OwnerEntry {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    #[serde(rename = "DisplayName")]
    pub display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GrantList {
    #[serde(rename = "Grant", default)]
    pub grants: Vec<GrantEntry>,
}

#[derive(Debug, Deserialize)]
pub struct GrantEntry {
    #[serde(rename = "Grantee")]
    pub grantee: GranteeEntry,
    #[serde(rename = "Permission")]
    pub permission: String,
}

/// Grantee variants are distinguished by which identifying field is present
#[derive(Debug, Deserialize)]
pub struct GranteeEntry {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    #[serde(rename = "DisplayName")]
    pub display_name: Option<String>,
    #[serde(rename = "URI")]
    pub uri: Option<String>,
}

/// `POST /bucket?delete` request body — `<Delete>`
#[derive(Debug, Serialize)]
#[serde(rename = "Delete")]
pub struct DeleteDocument {
    #[serde(rename = "Object")]
    pub objects: Vec<DeleteEntry>,
    #[serde(rename = "Quiet")]
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteEntry {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "VersionId", skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

/// `POST /bucket?delete` response — `<DeleteResult>`
#[derive(Debug, Deserialize)]
pub struct DeleteResult {
    #[serde(rename = "Error", default)]
    pub errors: Vec<DeleteErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteErrorEntry {
    #[serde(rename = "Key")]
    pub key: Option<String>,
    #[serde(rename = "Code")]
    pub code: Option<String>,
    #[serde(rename = "Message")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_error_document() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>NoSuchBucket</Code><Message>The specified bucket does not exist</Message></Error>"#;
        let doc: ErrorDocument = quick_xml::de::from_str(body).unwrap();
        assert_eq!(doc.code.as_deref(), Some("NoSuchBucket"));
    }

    #[test]
    fn parses_bucket_listing() {
        let body = r#"<ListAllMyBucketsResult>
  <Owner><ID>abc</ID></Owner>
  <Buckets>
    <Bucket><Name>first</Name><CreationDate>2024-03-01T12:00:00.000Z</CreationDate></Bucket>
    <Bucket><Name>second</Name><CreationDate>2024-03-02T12:00:00.000Z</CreationDate></Bucket>
  </Buckets>
</ListAllMyBucketsResult>"#;
        let doc: ListAllMyBucketsResult = quick_xml::de::from_str(body).unwrap();
        assert_eq!(doc.buckets.entries.len(), 2);
        assert_eq!(doc.buckets.entries[0].name, "first");
    }

    #[test]
    fn parses_version_listing_with_delete_markers() {
        let body = r#"<ListVersionsResult>
  <IsTruncated>false</IsTruncated>
  <Version><Key>a.txt</Key><VersionId>v1</VersionId><IsLatest>false</IsLatest><Size>3</Size></Version>
  <Version><Key>a.txt</Key><VersionId>v2</VersionId><IsLatest>true</IsLatest><Size>5</Size></Version>
  <DeleteMarker><Key>b.txt</Key><VersionId>v9</VersionId><IsLatest>true</IsLatest></DeleteMarker>
</ListVersionsResult>"#;
        let doc: ListVersionsResult = quick_xml::de::from_str(body).unwrap();
        assert_eq!(doc.versions.len(), 2);
        assert_eq!(doc.delete_markers.len(), 1);
        assert!(doc.versions[1].is_latest);
    }

    #[test]
    fn parses_acl_grants() {
        let body = r#"<AccessControlPolicy>
  <Owner><ID>owner-id</ID><DisplayName>owner</DisplayName></Owner>
  <AccessControlList>
    <Grant>
      <Grantee><ID>owner-id</ID></Grantee>
      <Permission>FULL_CONTROL</Permission>
    </Grant>
    <Grant>
      <Grantee><URI>http://acs.amazonaws.com/groups/global/AllUsers</URI></Grantee>
      <Permission>READ</Permission>
    </Grant>
  </AccessControlList>
</AccessControlPolicy>"#;
        let doc: AccessControlPolicy = quick_xml::de::from_str(body).unwrap();
        assert_eq!(doc.access_control_list.grants.len(), 2);
        assert!(doc.access_control_list.grants[1].grantee.uri.is_some());
    }

    #[test]
    fn serializes_delete_document() {
        let doc = DeleteDocument {
            objects: vec![
                DeleteEntry {
                    key: "a.txt".to_string(),
                    version_id: Some("v1".to_string()),
                },
                DeleteEntry {
                    key: "b.txt".to_string(),
                    version_id: None,
                },
            ],
            quiet: true,
        };
        let xml = quick_xml::se::to_string(&doc).unwrap();
        assert!(xml.starts_with("<Delete>"));
        assert!(xml.contains("<VersionId>v1</VersionId>"));
        assert!(!xml.contains("<VersionId/>"));
    }
}
