use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use task_relay::config::Config;
use task_relay::routes;
use task_relay::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("task_relay=debug,tower_http=debug")),
        )
        .init();

    let (mut config, loaded_path) = Config::discover()?;
    match &loaded_path {
        Some(path) => info!("Loaded configuration from: {}", path),
        None => info!("No configuration file found, using defaults"),
    }
    config.apply_env_overrides(|name| std::env::var(name).ok())?;
    config.validate()?;
    info!(
        origins = config.cors.allowed_origins.len(),
        llm = ?config.llm,
        "Configuration ready"
    );

    let bind_addr = (config.server.host.clone(), config.server.port);
    let app = routes::build_app(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Starting server on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
