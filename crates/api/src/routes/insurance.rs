//! Travel insurance premium routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::{info, warn};
use tripcover_core::pricing::CalculationResult;
use tripcover_shared::AppError;

use crate::{AppState, error::ApiError, extractors::CalculationPayload};

/// Creates the insurance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calculate", post(calculate_premium))
        .route("/rates", get(list_rates))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for a successful premium calculation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    /// Total cost in the insurance currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost_in_currency: Decimal,
    /// Total cost in the preferred currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost_in_preferred_currency: Decimal,
    /// Inclusive trip length in days.
    pub days_count: i64,
    /// Daily coefficient of the insured amount tier.
    #[serde(with = "rust_decimal::serde::float")]
    pub daily_coefficient: Decimal,
    /// Exchange rate applied.
    #[serde(with = "rust_decimal::serde::float")]
    pub exchange_rate: Decimal,
    /// Insured amount.
    pub insurance_amount: i64,
}

impl From<&CalculationResult> for CalculationResponse {
    fn from(result: &CalculationResult) -> Self {
        Self {
            total_cost_in_currency: round_for_display(result.total_cost_in_currency),
            total_cost_in_preferred_currency: round_for_display(
                result.total_cost_in_preferred_currency,
            ),
            days_count: result.day_count,
            daily_coefficient: round_for_display(result.daily_coefficient),
            exchange_rate: round_for_display(result.exchange_rate),
            insurance_amount: result.insured_amount,
        }
    }
}

/// Tier entry of the rates listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierResponse {
    /// Insured amount tier.
    pub insurance_amount: i64,
    /// Daily coefficient of the tier.
    #[serde(with = "rust_decimal::serde::float")]
    pub daily_coefficient: Decimal,
}

/// Currency entry of the rates listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateResponse {
    /// Upper-case currency code.
    pub currency_code: String,
    /// Rate into the preferred currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
}

/// Response for the rates listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesResponse {
    /// Configured tiers, ascending.
    pub coefficients: Vec<TierResponse>,
    /// Configured currencies, ascending by code.
    pub exchange_rates: Vec<ExchangeRateResponse>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Rounds to 2 decimal places, halves away from zero.
fn round_for_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/api/insurance/calculate` - Calculate a travel insurance premium.
async fn calculate_premium(
    State(state): State<AppState>,
    payload: CalculationPayload,
) -> Response {
    let request = payload.into_request();

    match state.engine.calculate(&request) {
        Ok(result) => {
            info!(
                insurance_amount = result.insured_amount,
                currency = %request.currency_code,
                day_count = result.day_count,
                "Premium calculated"
            );

            (StatusCode::OK, Json(CalculationResponse::from(&result))).into_response()
        }
        Err(e) => {
            warn!(error = ?e, "Premium calculation rejected");
            ApiError(AppError::from(e)).into_response()
        }
    }
}

/// GET `/api/insurance/rates` - List the current tariff.
async fn list_rates(State(state): State<AppState>) -> Json<RatesResponse> {
    let tariff = state.engine.rates().snapshot();

    Json(RatesResponse {
        coefficients: tariff
            .daily_coefficients()
            .iter()
            .map(|(amount, coefficient)| TierResponse {
                insurance_amount: *amount,
                daily_coefficient: *coefficient,
            })
            .collect(),
        exchange_rates: tariff
            .exchange_rates()
            .iter()
            .map(|(code, rate)| ExchangeRateResponse {
                currency_code: code.clone(),
                rate: *rate,
            })
            .collect(),
    })
}
