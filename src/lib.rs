// S3 Image Upload - upload images to S3-compatible storage and hand back public URLs

pub mod config;
pub mod models;
pub mod routes;
pub mod storage;
pub mod types;
pub mod upload;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
