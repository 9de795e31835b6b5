use std::time::Duration;

use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, info};

use super::{ObjectStore, StoredObject, object_key};
use crate::config::ObjectStoreConfig;
use crate::errors::{FlyerlinkError, Result};

/// S3-backed object store. Credentials and region come from the standard
/// AWS environment/profile chain; bucket and an optional custom endpoint
/// from configuration.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
    signed_url_ttl: Duration,
}

impl S3Store {
    pub async fn new(config: &ObjectStoreConfig) -> Result<Self> {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;

        let client = match &config.endpoint {
            Some(endpoint) if !endpoint.is_empty() => {
                let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                    .endpoint_url(endpoint)
                    .force_path_style(true)
                    .build();
                aws_sdk_s3::Client::from_conf(s3_config)
            }
            _ => aws_sdk_s3::Client::new(&sdk_config),
        };

        info!(
            "Object store initialized: bucket={} region={}",
            config.bucket, config.region
        );

        Ok(S3Store {
            client,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            signed_url_ttl: Duration::from_secs(config.signed_url_ttl_secs),
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket, self.region, key
        )
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Store {
    async fn put_pdf(&self, name: &str, body: Bytes) -> Result<StoredObject> {
        let key = object_key(name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type("application/pdf")
            .send()
            .await
            .map_err(|e| {
                FlyerlinkError::object_store(format!("Failed to upload '{}': {}", key, e))
            })?;

        debug!("Uploaded object: {}", key);

        Ok(StoredObject {
            url: self.public_url(&key),
            key,
        })
    }

    async fn signed_url(&self, key: &str) -> Result<String> {
        // HEAD first so a bad key surfaces as 404 instead of a signed link
        // to a nonexistent object.
        self.client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_not_found() {
                    FlyerlinkError::object_not_found(format!("No such object: {}", key))
                } else {
                    FlyerlinkError::object_store(format!(
                        "Failed to stat '{}': {}",
                        key, service_err
                    ))
                }
            })?;

        let presigning = PresigningConfig::expires_in(self.signed_url_ttl).map_err(|e| {
            FlyerlinkError::object_store(format!("Invalid presigning expiry: {}", e))
        })?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                FlyerlinkError::object_store(format!("Failed to presign '{}': {}", key, e))
            })?;

        Ok(presigned.uri().to_string())
    }
}
