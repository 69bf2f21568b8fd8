//! Stow Server binary.

use stow_server::{app, config::Config, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "stow_server=debug,stow_engine=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Starting Stow Server on {}:{}", config.host, config.port);
    match &config.data_dir {
        Some(dir) => tracing::info!("Persisting collections under {}", dir.display()),
        None => tracing::info!("Persisting collections in memory"),
    }
    tracing::info!(
        "Write mode: {:?}, cache enabled: {}",
        config.write_mode,
        config.cache_enabled
    );

    // Build application state
    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::from_config(config)?;

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
