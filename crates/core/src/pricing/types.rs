//! Request and result types for premium calculation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A parsed, typed premium calculation request.
///
/// The date ordering rule is checked by the engine, not by this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationRequest {
    /// Insured amount; must be one of the configured tiers.
    pub insured_amount: i64,
    /// First day of the trip.
    pub start_date: NaiveDate,
    /// Last day of the trip.
    pub end_date: NaiveDate,
    /// Upper-case ISO 4217 code of the settlement currency.
    pub currency_code: String,
}

impl CalculationRequest {
    /// Creates a request, normalizing the currency code to upper case.
    #[must_use]
    pub fn new(
        insured_amount: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        currency_code: &str,
    ) -> Self {
        Self {
            insured_amount,
            start_date,
            end_date,
            currency_code: currency_code.trim().to_uppercase(),
        }
    }
}

/// Outcome of a successful calculation.
///
/// Values are exact; rounding for presentation is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationResult {
    /// Daily coefficient multiplied by the day count.
    pub total_cost_in_currency: Decimal,
    /// Total cost converted with the exchange rate.
    pub total_cost_in_preferred_currency: Decimal,
    /// Inclusive number of calendar days.
    pub day_count: i64,
    /// Coefficient looked up for the insured amount.
    pub daily_coefficient: Decimal,
    /// Rate looked up for the currency.
    pub exchange_rate: Decimal,
    /// Insured amount from the request.
    pub insured_amount: i64,
}
