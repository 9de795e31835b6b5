//! Object storage for original and stamped PDFs.
//!
//! Everything lives under a flat `pdfs/<timestamp>-<name>` keyspace.

mod s3;

pub use s3::S3Store;

use std::sync::Arc;

use bytes::Bytes;

use crate::config::ObjectStoreConfig;
use crate::errors::Result;

/// Where an uploaded object ended up.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Public (unsigned) URL of the object.
    pub url: String,
    /// Storage key for later presigned downloads.
    pub key: String,
}

#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload bytes under `pdfs/<timestamp>-<name>`.
    async fn put_pdf(&self, name: &str, body: Bytes) -> Result<StoredObject>;

    /// Time-limited download URL for an existing key.
    ///
    /// The key is existence-checked first; a missing key is an
    /// `ObjectNotFound` error rather than a signed link to nothing.
    async fn signed_url(&self, key: &str) -> Result<String>;
}

pub struct ObjectStoreFactory;

impl ObjectStoreFactory {
    pub async fn create(config: &ObjectStoreConfig) -> Result<Arc<dyn ObjectStore>> {
        let store = S3Store::new(config).await?;
        Ok(Arc::new(store) as Arc<dyn ObjectStore>)
    }
}

/// Build the flat storage key for an object name.
pub(crate) fn object_key(name: &str) -> String {
    format!("pdfs/{}-{}", chrono::Utc::now().timestamp_millis(), name)
}
