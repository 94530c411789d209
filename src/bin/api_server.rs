// API Server Binary Entry Point
//
// Purpose: Start the Axum API server over the restaurant catalog
// Usage: cargo run --features api --bin api_server

use restaurant_catalog::config::AppConfig;
use restaurant_catalog::{create_router, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "restaurant_catalog=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = AppConfig::from_env();

    tracing::info!("Configuration:");
    tracing::info!("  DATA_URL: {}", config.data_url);
    tracing::info!("  DATA_PATH: {}", config.data_path.as_deref().unwrap_or("-"));
    tracing::info!("  CITY: {}", config.catalog.city);
    tracing::info!(
        "  GROQ_API_KEY: {}",
        if config.groq_api_key.is_some() { "set" } else { "unset (fallback insights)" }
    );
    tracing::info!("  PORT: {}", config.port);

    // Initialize application state (loads data, builds indexes)
    let state = AppState::new(&config).await?;
    tracing::info!(
        "Application state initialized ({} restaurants, origin {:?})",
        state.catalog.restaurants.len(),
        state.catalog.origin
    );

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
