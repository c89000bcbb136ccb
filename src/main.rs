use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use s3_image_upload::{config::Config, routes::create_router, storage::StorageClient, utils, AppState};

/// Serve the image upload form and push uploads to S3.
#[derive(Debug, Parser)]
#[command(name = "s3-image-upload", version, about)]
struct Args {
    /// Address to bind, overrides HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overrides PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    utils::init_logger();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    info!("Configuration loaded: {:?}", config.server);
    info!("Storage configuration: {:?}", config.storage);

    let storage = StorageClient::from_config(&config.storage).context("Failed to set up storage client")?;
    let state = AppState::new(config.clone(), storage);

    // Create router
    let app = create_router(state);

    // Start server
    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.server.host, config.server.port))?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
