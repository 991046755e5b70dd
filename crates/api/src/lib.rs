//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes
//! - The calculation request extractor (structural and field validation)
//! - Error responses

pub mod error;
pub mod extractors;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tripcover_core::pricing::CalculationEngine;

/// Application state shared across handlers.
#[derive(Clone, Default)]
pub struct AppState {
    /// Premium calculation engine and the tariff it reads.
    pub engine: Arc<CalculationEngine>,
}

impl AppState {
    /// Creates state around an engine.
    #[must_use]
    pub fn new(engine: CalculationEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .nest("/api/insurance", routes::api_routes())
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
