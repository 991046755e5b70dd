//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod insurance;

/// Creates the insurance API router (nested under `/api/insurance`).
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(insurance::routes())
}
