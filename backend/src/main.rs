use anyhow::Context;
use kennel_backend::{create_router, initialize_backend, KennelConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = KennelConfig::load()?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Setting up kennel backend");
    let state = initialize_backend(&config).await?;
    let app = create_router(state, &config)?;

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
