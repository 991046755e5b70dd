//! Premium calculation engine.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::error::CalculationError;
use super::rates::RateTable;
use super::types::{CalculationRequest, CalculationResult};

/// Inclusive number of calendar days between two dates (`end - start + 1`).
#[must_use]
pub fn day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Engine computing travel insurance premiums against a shared rate table.
#[derive(Debug, Clone, Default)]
pub struct CalculationEngine {
    rates: Arc<RateTable>,
}

impl CalculationEngine {
    /// Creates an engine reading from the given table.
    #[must_use]
    pub const fn new(rates: Arc<RateTable>) -> Self {
        Self { rates }
    }

    /// The table this engine reads from.
    #[must_use]
    pub const fn rates(&self) -> &Arc<RateTable> {
        &self.rates
    }

    /// Validates the request and computes the premium.
    ///
    /// Checks run in order and the first failure is returned: insured amount,
    /// currency, date range. Both lookups read the same tariff snapshot.
    pub fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, CalculationError> {
        let outcome = self.evaluate(request);

        match &outcome {
            Ok(result) => debug!(
                insurance_amount = request.insured_amount,
                currency = %request.currency_code,
                day_count = result.day_count,
                total = %result.total_cost_in_preferred_currency,
                "Premium calculated"
            ),
            Err(err) => debug!(
                insurance_amount = request.insured_amount,
                currency = %request.currency_code,
                error = %err,
                "Premium calculation rejected"
            ),
        }

        outcome
    }

    fn evaluate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, CalculationError> {
        let tariff = self.rates.snapshot();

        let daily_coefficient = tariff
            .coefficient_for(request.insured_amount)
            .map_err(|_| CalculationError::InvalidInsuredAmount {
                amount: request.insured_amount,
            })?;

        let exchange_rate = tariff.rate_for(&request.currency_code).map_err(|_| {
            CalculationError::InvalidCurrency {
                code: request.currency_code.clone(),
            }
        })?;

        if request.end_date <= request.start_date {
            return Err(CalculationError::InvalidDateRange {
                start: request.start_date,
                end: request.end_date,
            });
        }

        let day_count = day_count(request.start_date, request.end_date);

        let total_cost_in_currency = daily_coefficient
            .checked_mul(Decimal::from(day_count))
            .ok_or(CalculationError::Overflow)?;
        let total_cost_in_preferred_currency = total_cost_in_currency
            .checked_mul(exchange_rate)
            .ok_or(CalculationError::Overflow)?;

        Ok(CalculationResult {
            total_cost_in_currency,
            total_cost_in_preferred_currency,
            day_count,
            daily_coefficient,
            exchange_rate,
            insured_amount: request.insured_amount,
        })
    }
}
