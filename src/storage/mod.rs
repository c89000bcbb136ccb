//! Storage layer (S3-compatible)
//!
//! [`StorageClient`] writes blobs through an [`ObjectStore`] backend and
//! builds the public URL for each stored key from the configured base URL.

pub mod keys;
pub mod memory;
pub mod s3_client;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{error, info};

use crate::config::{StorageConfig, StorageProvider};

pub use keys::*;
pub use memory::MemoryStore;
pub use s3_client::S3Store;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("AWS credentials not found")]
    CredentialsMissing,

    #[error("Failed to upload to S3: {0}")]
    BackendRejected(String),

    #[error("Invalid storage configuration: {0}")]
    Configuration(String),
}

/// A blob store that can hold an object under a key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError>;
}

#[derive(Clone)]
pub struct StorageClient {
    backend: Arc<dyn ObjectStore>,
    base_url: String,
}

impl StorageClient {
    pub fn new(backend: Arc<dyn ObjectStore>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { backend, base_url }
    }

    /// Build the client for whichever backend the configuration selects.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let backend: Arc<dyn ObjectStore> = match config.provider {
            StorageProvider::S3 => Arc::new(S3Store::from_config(config)?),
            StorageProvider::Memory => Arc::new(MemoryStore::new()),
        };
        info!(provider = ?config.provider, base_url = %config.base_url, "Storage client ready");
        Ok(Self::new(backend, config.base_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Store `data` under `key` and return its public URL.
    ///
    /// The URL is derived from the base URL alone; nothing checks that it
    /// is actually reachable.
    pub async fn store(&self, data: Bytes, key: &str, content_type: &str) -> Result<String, StorageError> {
        let size = data.len();
        if let Err(e) = self.backend.put_object(key, data, content_type).await {
            error!(storage_key = %key, error = %e, "Object write failed");
            return Err(e);
        }

        info!(storage_key = %key, bytes = size, content_type, "Object stored");
        Ok(self.public_url(key))
    }
}
