use anyhow::Context;
use log::info;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use ownedit_backend::config::AppConfig;
use ownedit_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default level; `log` records are forwarded too
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    info!("Using data directory {}", config.data_directory.display());

    let bind_address = config.bind_address.clone();
    let app_state = initialize_backend(config).await?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Starting server on {}", bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
