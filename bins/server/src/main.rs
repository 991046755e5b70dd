//! Tripcover API Server
//!
//! Main entry point for the travel insurance premium service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tripcover_api::{AppState, create_router};
use tripcover_core::pricing::{CalculationEngine, RateTable};
use tripcover_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripcover=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Build the tariff and the engine reading from it
    let rates = Arc::new(RateTable::from_config(&config.tariff));
    info!(
        tiers = ?rates.tiers(),
        currencies = ?rates.currencies(),
        "Tariff loaded"
    );
    let state = AppState::new(CalculationEngine::new(rates));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
