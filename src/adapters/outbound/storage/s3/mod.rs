//! S3-compatible REST adapter.
//!
//! Speaks the service's XML protocol directly over HTTP with AWS Signature v4
//! authentication, which keeps bucket-level operations (creation, ACLs,
//! versioning) and upload attributes (encryption, storage class) available
//! alongside the plain data path.

mod bucket;
mod client;
mod object;
pub(crate) mod xml;

pub use client::{S3Client, S3Config};

use std::sync::Arc;

/// Storage adapter backed by an S3-compatible service
#[derive(Clone)]
pub struct S3StorageAdapter {
    client: Arc<S3Client>,
}

impl S3StorageAdapter {
    pub fn new(client: S3Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub(crate) fn client(&self) -> &S3Client {
        &self.client
    }
}
