use anyhow::Context;
use init_api::{create_router, logging, AppState, Config};
use tokio::{net::TcpListener, signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the environment may already be set
    let _ = dotenvy::dotenv();
    logging::init_tracing();

    let config = Config::from_env().context("Invalid configuration")?;
    let bind_address = config.bind_address.clone();
    let state = AppState::from_config(config).context("Failed to build application state")?;

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    tracing::info!(address = %bind_address, "Admin API listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Admin API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
