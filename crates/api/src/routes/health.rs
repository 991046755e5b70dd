//! Health check endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Number of insured amount tiers currently configured.
    pub tiers: usize,
    /// Number of currencies currently configured.
    pub currencies: usize,
}

/// Health check handler. An empty tariff reports `degraded`.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let tariff = state.engine.rates().snapshot();
    let tiers = tariff.daily_coefficients().len();
    let currencies = tariff.exchange_rates().len();

    Json(HealthResponse {
        status: if tiers > 0 && currencies > 0 {
            "healthy"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        tiers,
        currencies,
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
