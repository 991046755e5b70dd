//! Travel insurance premium calculation.
//!
//! This module implements the pricing core:
//! - Tariff tables (daily coefficient per tier, exchange rate per currency)
//! - Calculation engine (business validation, day count, cost)
//! - Request and result types
//! - Error types for lookups and calculations

pub mod engine;
pub mod error;
pub mod rates;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::{CalculationEngine, day_count};
pub use error::{CalculationError, RateTableError};
pub use rates::{RateTable, TariffSnapshot};
pub use types::{CalculationRequest, CalculationResult};
