// S3 backend built on rust-s3

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};
use tracing::{debug, warn};

use super::{ObjectStore, StorageError};
use crate::config::StorageConfig;

pub struct S3Store {
    /// `None` when no access key pair was configured; every write then
    /// fails with [`StorageError::CredentialsMissing`].
    bucket: Option<Arc<Bucket>>,
}

impl S3Store {
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let region = match &config.s3_endpoint {
            Some(endpoint) => Region::Custom {
                region: config.s3_region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .s3_region
                .parse::<Region>()
                .map_err(|e| StorageError::Configuration(format!("region '{}': {}", config.s3_region, e)))?,
        };

        if !config.has_credentials() {
            warn!("AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY not set, uploads will be rejected");
            return Ok(Self { bucket: None });
        }

        let credentials = Credentials::new(
            config.s3_access_key_id.as_deref(),
            config.s3_secret_access_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|_| StorageError::CredentialsMissing)?;

        let bucket = Bucket::new(&config.s3_bucket, region, credentials)
            .map_err(|e| StorageError::Configuration(e.to_string()))?;

        // S3-compatible services behind a custom endpoint generally do not
        // support virtual-hosted addressing.
        let bucket: Arc<Bucket> = if config.s3_endpoint.is_some() {
            Arc::from(bucket.with_path_style())
        } else {
            Arc::from(bucket)
        };

        debug!(bucket = %config.s3_bucket, region = %config.s3_region, "S3 bucket configured");
        Ok(Self { bucket: Some(bucket) })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        let bucket = self.bucket.as_ref().ok_or(StorageError::CredentialsMissing)?;

        let response = bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(map_s3_error)?;

        match response.status_code() {
            200..=299 => Ok(()),
            status => Err(StorageError::BackendRejected(format!(
                "status {}: {}",
                status,
                String::from_utf8_lossy(response.bytes())
            ))),
        }
    }
}

fn map_s3_error(err: S3Error) -> StorageError {
    match err {
        S3Error::Credentials(_) => StorageError::CredentialsMissing,
        other => StorageError::BackendRejected(other.to_string()),
    }
}
