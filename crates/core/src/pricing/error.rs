//! Pricing error types.
//!
//! Display strings of `CalculationError` are the messages returned to API
//! clients, so they carry no internal detail.

use chrono::NaiveDate;
use thiserror::Error;
use tripcover_shared::AppError;

/// Lookup failures of the rate table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateTableError {
    /// No daily coefficient is configured for the insured amount.
    #[error("No daily coefficient configured for insured amount {0}")]
    UnknownTier(i64),

    /// No exchange rate is configured for the currency code.
    #[error("No exchange rate configured for currency {0}")]
    UnknownCurrency(String),
}

/// Business rule violations raised by the calculation engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculationError {
    /// Insured amount is not a configured tier.
    #[error("Invalid insurance amount")]
    InvalidInsuredAmount {
        /// Rejected amount.
        amount: i64,
    },

    /// Currency code has no configured exchange rate.
    #[error("Invalid currency code")]
    InvalidCurrency {
        /// Rejected code.
        code: String,
    },

    /// End date is not strictly after the start date.
    #[error("End date must be after start date")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Cost does not fit the decimal range.
    #[error("Calculated cost is out of range")]
    Overflow,
}

impl CalculationError {
    /// Returns true for errors caused by the request rather than the tariff.
    #[must_use]
    pub const fn is_business_rule(&self) -> bool {
        !matches!(self, Self::Overflow)
    }
}

impl From<CalculationError> for AppError {
    fn from(err: CalculationError) -> Self {
        if err.is_business_rule() {
            Self::BusinessRule(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}
