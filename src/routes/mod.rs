//! HTTP Routes
//!
//! - `GET /` - Upload form
//! - `POST /upload` - Multipart upload (`prefix`, `file`), renders the result page
//! - `GET /health` - Health check

pub mod files;
pub mod health;
pub mod ui;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .merge(ui::router())
        .merge(health::router())
        .merge(files::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ServerConfig, StorageConfig, DEFAULT_MAX_UPLOAD_BYTES};
    use crate::models::HealthResponse;
    use crate::storage::{MemoryStore, StorageClient};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    const BASE_URL: &str = "https://images.example.com";
    const BOUNDARY: &str = "X-UPLOAD-BOUNDARY";

    fn test_app() -> (Arc<MemoryStore>, Router) {
        test_app_with_limit(DEFAULT_MAX_UPLOAD_BYTES)
    }

    fn test_app_with_limit(max_upload_bytes: usize) -> (Arc<MemoryStore>, Router) {
        let memory = Arc::new(MemoryStore::new());
        let config = Config {
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
                max_upload_bytes,
            },
            storage: StorageConfig::memory(BASE_URL),
        };
        let storage = StorageClient::new(memory.clone(), BASE_URL);
        (memory, create_router(AppState::new(config, storage)))
    }

    fn text_part(name: &str, value: &str) -> Vec<u8> {
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        )
        .into_bytes()
    }

    fn file_part(filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut part = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            BOUNDARY, filename, content_type
        )
        .into_bytes();
        part.extend_from_slice(data);
        part.extend_from_slice(b"\r\n");
        part
    }

    fn closing() -> Vec<u8> {
        format!("--{}--\r\n", BOUNDARY).into_bytes()
    }

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (_, app) = test_app();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let health: HealthResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(health, HealthResponse::healthy());
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, "S3 Upload Service");
    }

    #[tokio::test]
    async fn test_index_renders_form() {
        let (_, app) = test_app();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("<form"));
        assert!(html.contains("enctype=\"multipart/form-data\""));
    }

    #[tokio::test]
    async fn test_upload_success() {
        let (memory, app) = test_app();
        let mut body = text_part("prefix", "pets/");
        body.extend(file_part("cat.png", "image/png", b"\x89PNG\r\n\x1a\nDATA"));
        body.extend(closing());

        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Upload complete"));
        assert!(html.contains("cat.png"));
        assert!(html.contains("12 bytes"));

        assert_eq!(memory.len().await, 1);
    }

    #[tokio::test]
    async fn test_upload_without_prefix_value_stores_at_root() {
        let (memory, app) = test_app();
        let mut body = text_part("prefix", "");
        body.extend(file_part("dog.JPG", "image/jpeg", b"\xff\xd8\xffjpeg"));
        body.extend(closing());

        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("Upload complete"));
        assert_eq!(memory.len().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_extension_is_bad_request() {
        let (memory, app) = test_app();
        let mut body = text_part("prefix", "docs");
        body.extend(file_part("photo.TXT", "text/plain", b"hello"));
        body.extend(closing());

        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let detail = json["detail"].as_str().unwrap();
        assert!(detail.starts_with("Invalid file type"));
        assert!(detail.contains(".webp"));
        assert!(memory.is_empty().await);
    }

    #[tokio::test]
    async fn test_no_file_selected_is_bad_request() {
        let (_, app) = test_app();
        let mut body = text_part("prefix", "pets");
        body.extend(file_part("", "application/octet-stream", b""));
        body.extend(closing());

        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["detail"], "No file selected");
    }

    #[tokio::test]
    async fn test_missing_prefix_is_bad_request() {
        let (memory, app) = test_app();
        let mut body = file_part("cat.png", "image/png", b"png");
        body.extend(closing());

        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(memory.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_file_renders_failure() {
        let (memory, app) = test_app();
        let mut body = text_part("prefix", "pets");
        body.extend(file_part("cat.png", "image/png", b""));
        body.extend(closing());

        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Upload failed"));
        assert!(html.contains("Empty file"));
        assert!(memory.is_empty().await);
    }

    #[tokio::test]
    async fn test_truncated_file_renders_read_error() {
        let (memory, app) = test_app();
        let mut body = text_part("prefix", "pets");
        body.extend(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cat.png\"\r\nContent-Type: image/png\r\n\r\npartial-data",
                BOUNDARY
            )
            .into_bytes(),
        );

        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Failed to read file"));
        assert!(memory.is_empty().await);
    }

    #[tokio::test]
    async fn test_oversized_file_renders_read_error() {
        let (memory, app) = test_app_with_limit(1024);
        let mut body = text_part("prefix", "pets");
        body.extend(file_part("cat.png", "image/png", &[0x42; 4096]));
        body.extend(closing());

        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Failed to read file"));
        assert!(!html.contains("Upload complete"));
        assert!(memory.is_empty().await);
    }

    #[tokio::test]
    async fn test_oversized_bad_extension_before_prefix_is_bad_request() {
        let (memory, app) = test_app_with_limit(1024);
        let mut body = file_part("cat.TXT", "text/plain", &[b'a'; 4096]);
        body.extend(text_part("prefix", "pets"));
        body.extend(closing());

        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(json["detail"].as_str().unwrap().starts_with("Invalid file type"));
        assert!(memory.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_file_field_is_bad_request() {
        let (_, app) = test_app();
        let mut body = text_part("prefix", "pets");
        body.extend(closing());

        let response = app.oneshot(upload_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(
            json["detail"],
            crate::upload::UploadRejection::NoFileSelected.to_string()
        );
    }
}
