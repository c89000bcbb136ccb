//! HTML pages: the upload form and the upload result.

use askama::Template;
use axum::{response::Html, routing::get, Router};

use crate::types::{AppError, AppResult};
use crate::upload::validation::{allowed_extensions_list, ALLOWED_EXTENSIONS};
use crate::upload::UploadResult;

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(index))
}

#[derive(Template)]
#[template(path = "upload.html")]
struct UploadFormTemplate {
    accept: String,
    allowed: String,
}

#[derive(Template, Default)]
#[template(path = "result.html")]
pub struct ResultTemplate {
    success: bool,
    file_url: String,
    original_filename: String,
    storage_key: String,
    file_size: usize,
    error: String,
}

impl From<&UploadResult> for ResultTemplate {
    fn from(result: &UploadResult) -> Self {
        match result {
            UploadResult::Stored(stored) => Self {
                success: true,
                file_url: stored.file_url.clone(),
                original_filename: stored.original_filename.clone(),
                storage_key: stored.storage_key.clone(),
                file_size: stored.file_size,
                error: String::new(),
            },
            UploadResult::Failed { error } => Self {
                success: false,
                error: error.clone(),
                ..Default::default()
            },
        }
    }
}

pub fn render<T: Template>(template: &T) -> AppResult<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("template rendering failed: {}", e)))
}

async fn index() -> AppResult<Html<String>> {
    let accept = ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",");

    render(&UploadFormTemplate {
        accept,
        allowed: allowed_extensions_list(),
    })
}
