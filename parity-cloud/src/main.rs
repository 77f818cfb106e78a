//! parity-cloud — geolocation discount banner service
//!
//! Long-running service that:
//! - Manages merchants' products, discount overrides, and banner styling (JWT authenticated)
//! - Resolves visitor country codes to discount banners
//! - Serves the public embed script merchants drop into their sites

mod api;
mod auth;
mod cache;
mod config;
mod db;
mod error;
mod state;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parity_cloud=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting parity-cloud (env: {})", config.environment);

    // Initialize application state
    let state = AppState::new(&config).await?;

    // Periodic cache sweep (every 5 minutes)
    let cache = state.cache.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            cache.cleanup();
        }
    });

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("parity-cloud listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
