use bytes::Bytes;
use chrono::Utc;
use hmac::{Hmac, Mac};
use http::Method;
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use crate::adapters::outbound::storage::error::StoreError;
use crate::adapters::outbound::storage::s3::xml;

type HmacSha256 = Hmac<Sha256>;

/// Connection settings for an S3-compatible endpoint.
///
/// Read once at construction and reused for every call; credentials and region
/// are the only ambient state the adapter carries.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Host (and optional port) of the service, without scheme
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub secure: bool,
    pub session_token: Option<String>,
}

impl S3Config {
    /// Settings for the public AWS endpoint of a region
    pub fn aws(region: impl Into<String>, access_key: String, secret_key: String) -> Self {
        let region = region.into();
        Self {
            endpoint: format!("s3.{}.amazonaws.com", region),
            region,
            access_key,
            secret_key,
            secure: true,
            session_token: None,
        }
    }
}

/// Signed request descriptor handed to [`S3Client::execute`]
pub(crate) struct S3Request<'a> {
    pub method: Method,
    pub bucket: Option<&'a str>,
    pub key: Option<&'a str>,
    /// Query parameters, unencoded; sub-resource markers use an empty value
    pub query: Vec<(String, String)>,
    /// Extra headers; `x-amz-*` entries participate in signing
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl<'a> S3Request<'a> {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            bucket: None,
            key: None,
            query: Vec::new(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn bucket(mut self, bucket: &'a str) -> Self {
        self.bucket = Some(bucket);
        self
    }

    pub fn key(mut self, key: &'a str) -> Self {
        self.key = Some(key);
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }
}

/// Low-level client for the service's REST API
#[derive(Clone, Debug)]
pub struct S3Client {
    config: S3Config,
    http_client: Client,
}

impl S3Client {
    pub fn new(config: S3Config) -> Result<Self, StoreError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(StoreError::Transport)?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn region(&self) -> &str {
        &self.config.region
    }

    /// Whether the configured region is the service default, which changes the
    /// shape of bucket-creation requests
    pub fn is_default_region(&self) -> bool {
        self.config.region == "us-east-1"
    }

    fn scheme(&self) -> &'static str {
        if self.config.secure { "https" } else { "http" }
    }

    fn canonical_uri(bucket: Option<&str>, key: Option<&str>) -> String {
        let mut uri = String::from("/");
        if let Some(bucket) = bucket {
            uri.push_str(bucket);
            if let Some(key) = key {
                uri.push('/');
                let encoded: Vec<String> = key
                    .split('/')
                    .map(|segment| urlencoding::encode(segment).into_owned())
                    .collect();
                uri.push_str(&encoded.join("/"));
            }
        }
        uri
    }

    fn canonical_query(query: &[(String, String)]) -> String {
        let mut pairs: Vec<(String, String)> = query
            .iter()
            .map(|(name, value)| {
                (
                    urlencoding::encode(name).into_owned(),
                    urlencoding::encode(value).into_owned(),
                )
            })
            .collect();
        pairs.sort();
        pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Sign and execute a request, decoding service error bodies on failure
    pub(crate) async fn execute(&self, request: S3Request<'_>) -> Result<reqwest::Response, StoreError> {
        let canonical_uri = Self::canonical_uri(request.bucket, request.key);
        let canonical_query = Self::canonical_query(&request.query);

        let now = Utc::now();
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        let payload_hash = hex::encode(Sha256::digest(&request.body));

        // Signed headers: host plus every x-amz-* header, sorted by name
        let mut signed: BTreeMap<String, String> = BTreeMap::new();
        signed.insert("host".to_string(), self.config.endpoint.clone());
        signed.insert("x-amz-content-sha256".to_string(), payload_hash.clone());
        signed.insert("x-amz-date".to_string(), amz_date.clone());
        if let Some(token) = &self.config.session_token {
            signed.insert("x-amz-security-token".to_string(), token.clone());
        }
        for (name, value) in &request.headers {
            let name = name.to_ascii_lowercase();
            if name.starts_with("x-amz-") {
                signed.insert(name, value.trim().to_string());
            }
        }

        let canonical_headers: String = signed
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value))
            .collect();
        let signed_headers = signed.keys().cloned().collect::<Vec<_>>().join(";");

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            request.method.as_str(),
            canonical_uri,
            canonical_query,
            canonical_headers,
            signed_headers,
            payload_hash
        );

        let algorithm = "AWS4-HMAC-SHA256";
        let credential_scope = format!("{}/{}/s3/aws4_request", date_stamp, self.config.region);
        let canonical_request_hash = hex::encode(Sha256::digest(canonical_request.as_bytes()));
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            algorithm, amz_date, credential_scope, canonical_request_hash
        );

        let signature = self.calculate_signature(&date_stamp, &string_to_sign)?;
        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            algorithm, self.config.access_key, credential_scope, signed_headers, signature
        );

        let mut url = format!("{}://{}{}", self.scheme(), self.config.endpoint, canonical_uri);
        if !canonical_query.is_empty() {
            url.push('?');
            url.push_str(&canonical_query);
        }

        let method = match request.method.as_str() {
            "GET" => reqwest::Method::GET,
            "PUT" => reqwest::Method::PUT,
            "POST" => reqwest::Method::POST,
            "DELETE" => reqwest::Method::DELETE,
            "HEAD" => reqwest::Method::HEAD,
            other => {
                return Err(StoreError::Other(format!(
                    "unsupported HTTP method: {}",
                    other
                )));
            }
        };

        debug!(method = %request.method, url = %url, "executing storage request");

        let mut req = self
            .http_client
            .request(method, &url)
            .header("x-amz-date", &amz_date)
            .header("x-amz-content-sha256", &payload_hash)
            .header("Authorization", &authorization);

        if let Some(token) = &self.config.session_token {
            req = req.header("x-amz-security-token", token);
        }

        // Unsigned extras (Content-Type, Content-MD5) ride along as-is
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let is_head = request.method == Method::HEAD;
        let response = req.body(request.body).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Decode the service's XML error body for the code and message
        let status_code = status.as_u16();
        let body = if is_head {
            Bytes::new()
        } else {
            response.bytes().await.unwrap_or_default()
        };

        let (code, message) = match quick_xml::de::from_str::<xml::ErrorDocument>(
            &String::from_utf8_lossy(&body),
        ) {
            Ok(doc) => (doc.code, doc.message),
            Err(_) => (None, None),
        };

        Err(StoreError::Service {
            status: status_code,
            code,
            message: message.unwrap_or_else(|| {
                format!("request failed with status {}", status_code)
            }),
        })
    }

    /// Derive the request signature from the scoped signing key
    fn calculate_signature(
        &self,
        date_stamp: &str,
        string_to_sign: &str,
    ) -> Result<String, StoreError> {
        let k_date = Self::hmac_sha256(
            format!("AWS4{}", self.config.secret_key).as_bytes(),
            date_stamp.as_bytes(),
        )?;
        let k_region = Self::hmac_sha256(&k_date, self.config.region.as_bytes())?;
        let k_service = Self::hmac_sha256(&k_region, b"s3")?;
        let k_signing = Self::hmac_sha256(&k_service, b"aws4_request")?;

        let signature = Self::hmac_sha256(&k_signing, string_to_sign.as_bytes())?;
        Ok(hex::encode(signature))
    }

    fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, StoreError> {
        let mut mac = HmacSha256::new_from_slice(key)
            .map_err(|e| StoreError::Signing(format!("HMAC key error: {}", e)))?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_uri_encodes_key_segments() {
        assert_eq!(S3Client::canonical_uri(None, None), "/");
        assert_eq!(S3Client::canonical_uri(Some("bucket"), None), "/bucket");
        assert_eq!(
            S3Client::canonical_uri(Some("bucket"), Some("a/b c.txt")),
            "/bucket/a/b%20c.txt"
        );
    }

    #[test]
    fn canonical_query_sorts_and_encodes() {
        let query = vec![
            ("versions".to_string(), "".to_string()),
            ("key-marker".to_string(), "a b".to_string()),
        ];
        assert_eq!(
            S3Client::canonical_query(&query),
            "key-marker=a%20b&versions="
        );
    }

    #[test]
    fn default_region_detection() {
        let config = S3Config::aws("us-east-1", "ak".into(), "sk".into());
        assert!(S3Client::new(config).unwrap().is_default_region());

        let config = S3Config::aws("eu-north-1", "ak".into(), "sk".into());
        assert!(!S3Client::new(config).unwrap().is_default_region());
    }
}
