use axum::{
    extract::{Multipart, State},
    response::Html,
    routing::post,
    Router,
};
use tracing::{debug, info};

use crate::models::AppState;
use crate::routes::ui::{render, ResultTemplate};
use crate::types::{AppError, AppResult};
use crate::upload::{handle_upload, UploadRejection, UploadRequest};

pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(upload_image))
}

struct FilePart {
    filename: Option<String>,
    content_type: Option<String>,
    body: Result<bytes::Bytes, String>,
}

async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Html<String>> {
    info!("File upload request received");

    let mut prefix: Option<String> = None;
    let mut file: Option<FilePart> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("prefix") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidRequest(format!("Failed to read prefix: {}", e)))?;
                prefix = Some(value);
            }
            Some("file") => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let body = field.bytes().await.map_err(|e| e.to_string());
                // The stream is unusable once a body read fails.
                let failed = body.is_err();
                file = Some(FilePart {
                    filename,
                    content_type,
                    body,
                });
                if failed {
                    break;
                }
            }
            other => debug!(field = ?other, "Ignoring unexpected form field"),
        }
    }

    let Some(file) = file else {
        return Err(UploadRejection::NoFileSelected.into());
    };

    let prefix = match (prefix, &file.body) {
        (Some(prefix), _) => prefix,
        (None, Err(_)) => String::new(),
        (None, Ok(_)) => {
            return Err(AppError::InvalidRequest("Missing form field: prefix".to_string()));
        }
    };

    let request = UploadRequest {
        prefix,
        filename: file.filename,
        content_type: file.content_type,
        body: file.body,
    };

    let result = handle_upload(&state.storage, request).await?;
    render(&ResultTemplate::from(&result))
}
