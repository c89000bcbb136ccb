use crate::config::Config;
use crate::storage::StorageClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: StorageClient,
}

impl AppState {
    pub fn new(config: Config, storage: StorageClient) -> Self {
        Self { config, storage }
    }
}

// API Request/Response types

#[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "S3 Upload Service".to_string(),
        }
    }
}
