//! Upload pipeline
//!
//! Validates an incoming file, names it, and hands it to the storage client.
//! Filename problems are rejected up front as [`UploadRejection`]; everything
//! after that produces an [`UploadResult`] that the result page can render.

pub mod validation;

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use crate::storage::{build_key, StorageClient, StorageError};
use crate::types::AppError;
use validation::{allowed_extensions_list, is_valid_image};

pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// One file received from the upload form.
#[derive(Debug)]
pub struct UploadRequest {
    pub prefix: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    /// The file body, or the reason it could not be read.
    pub body: Result<Bytes, String>,
}

/// Request-level validation failures. These never reach the result page.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("No file selected")]
    NoFileSelected,

    #[error("Invalid file type. Allowed types: {}", allowed_extensions_list())]
    InvalidFileType,
}

impl From<UploadRejection> for AppError {
    fn from(rejection: UploadRejection) -> Self {
        AppError::InvalidRequest(rejection.to_string())
    }
}

/// Failures reported to the user on the result page.
#[derive(Debug, Error)]
pub enum UploadFailure {
    #[error("Empty file")]
    EmptyFile,

    #[error("Failed to read file: {0}")]
    ReadError(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub file_url: String,
    pub original_filename: String,
    pub storage_key: String,
    pub file_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Stored(StoredUpload),
    Failed { error: String },
}

impl UploadResult {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadResult::Stored(_))
    }
}

impl From<UploadFailure> for UploadResult {
    fn from(failure: UploadFailure) -> Self {
        UploadResult::Failed {
            error: failure.to_string(),
        }
    }
}

/// Run one upload through validation, naming and storage.
pub async fn handle_upload(
    storage: &StorageClient,
    request: UploadRequest,
) -> Result<UploadResult, UploadRejection> {
    let filename = match request.filename.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(UploadRejection::NoFileSelected),
    };

    if !is_valid_image(&filename) {
        warn!(filename = %filename, "Rejected upload with unsupported extension");
        return Err(UploadRejection::InvalidFileType);
    }

    match store_file(storage, &request.prefix, &filename, request.content_type.as_deref(), request.body).await {
        Ok(stored) => Ok(UploadResult::Stored(stored)),
        Err(failure) => {
            warn!(filename = %filename, error = %failure, "Upload failed");
            Ok(failure.into())
        }
    }
}

async fn store_file(
    storage: &StorageClient,
    prefix: &str,
    filename: &str,
    content_type: Option<&str>,
    body: Result<Bytes, String>,
) -> Result<StoredUpload, UploadFailure> {
    let data = body.map_err(UploadFailure::ReadError)?;
    if data.is_empty() {
        return Err(UploadFailure::EmptyFile);
    }

    let storage_key = build_key(prefix, filename);
    let content_type = resolve_content_type(content_type, filename);
    let file_size = data.len();

    let file_url = storage.store(data, &storage_key, &content_type).await?;
    info!(storage_key = %storage_key, bytes = file_size, "Upload complete");

    Ok(StoredUpload {
        file_url,
        original_filename: filename.to_string(),
        storage_key,
        file_size,
    })
}

/// Declared content type, else a guess from the extension, else JPEG.
pub fn resolve_content_type(declared: Option<&str>, filename: &str) -> String {
    match declared.map(str::trim) {
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_string(),
        _ => mime_guess::from_path(filename)
            .first()
            .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
    }
}
