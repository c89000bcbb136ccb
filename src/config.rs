use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::fmt;

pub const DEFAULT_REGION: &str = "ap-northeast-2";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    S3,
    Memory,
}

impl std::str::FromStr for StorageProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(StorageProvider::S3),
            "memory" => Ok(StorageProvider::Memory),
            other => bail!("Unknown STORAGE_PROVIDER '{}', expected 's3' or 'memory'", other),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_access_key_id: Option<String>,
    pub s3_secret_access_key: Option<String>,
    pub s3_endpoint: Option<String>,
    /// Prefix for the public links handed back to clients. Not checked
    /// against the bucket's real endpoint.
    pub base_url: String,
}

// The secret key must never end up in logs, so Debug is written by hand.
impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("provider", &self.provider)
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_region", &self.s3_region)
            .field("s3_access_key_id", &self.s3_access_key_id)
            .field(
                "s3_secret_access_key",
                &self.s3_secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("s3_endpoint", &self.s3_endpoint)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl StorageConfig {
    /// Storage settings for the in-memory backend.
    pub fn memory(base_url: impl Into<String>) -> Self {
        Self {
            provider: StorageProvider::Memory,
            s3_bucket: String::new(),
            s3_region: DEFAULT_REGION.to_string(),
            s3_access_key_id: None,
            s3_secret_access_key: None,
            s3_endpoint: None,
            base_url: base_url.into(),
        }
    }

    pub fn has_credentials(&self) -> bool {
        matches!(
            (&self.s3_access_key_id, &self.s3_secret_access_key),
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty()
        )
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source. Blank values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let provider: StorageProvider = var("STORAGE_PROVIDER")
            .unwrap_or_else(|| "s3".to_string())
            .parse()?;
        let s3_bucket = var("S3_BUCKET_NAME").unwrap_or_default();
        let s3_region = var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());

        if provider == StorageProvider::S3 && s3_bucket.is_empty() {
            bail!("S3_BUCKET_NAME must be set when STORAGE_PROVIDER is 's3'");
        }

        // Nothing serves memory-backed objects, so there is no sensible
        // default link for them.
        let base_url = match (var("S3_BASE_URL"), provider) {
            (Some(base_url), _) => base_url,
            (None, StorageProvider::S3) => default_base_url(&s3_bucket, &s3_region),
            (None, StorageProvider::Memory) => {
                bail!("S3_BASE_URL must be set when STORAGE_PROVIDER is 'memory'")
            }
        };

        Ok(Self {
            server: ServerConfig {
                port: var("PORT")
                    .unwrap_or_else(|| "8888".to_string())
                    .parse()
                    .context("PORT must be a valid port number")?,
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                max_upload_bytes: var("MAX_UPLOAD_BYTES")
                    .unwrap_or_else(|| DEFAULT_MAX_UPLOAD_BYTES.to_string())
                    .parse()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
            },
            storage: StorageConfig {
                provider,
                s3_bucket,
                s3_region,
                s3_access_key_id: var("AWS_ACCESS_KEY_ID"),
                s3_secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
                s3_endpoint: var("S3_ENDPOINT"),
                base_url,
            },
        })
    }
}

/// Virtual-hosted style URL for a bucket on AWS.
pub fn default_base_url(bucket: &str, region: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com", bucket, region)
}
