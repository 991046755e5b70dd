//! Property-based tests for the calculation engine.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{CalculationEngine, CalculationError, CalculationRequest, RateTable};

/// Strategy to generate a trip start between 2000-01-01 and roughly 2050.
fn start_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..18_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Days::new(offset)
    })
}

/// Strategy to generate one of the default tiers.
fn known_tier() -> impl Strategy<Value = i64> {
    prop_oneof![Just(30_000i64), Just(50_000i64)]
}

/// Strategy to generate a default currency in any letter case.
fn known_currency() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("EUR".to_string()),
        Just("eur".to_string()),
        Just("USD".to_string()),
        Just("Usd".to_string()),
    ]
}

/// Strategy to generate a tier that is not configured by default.
fn unknown_tier() -> impl Strategy<Value = i64> {
    any::<i64>().prop_filter("must not be a configured tier", |amount| {
        *amount != 30_000 && *amount != 50_000
    })
}

/// Strategy to generate a three letter code other than EUR and USD.
fn unknown_currency() -> impl Strategy<Value = String> {
    "[a-zA-Z]{3}".prop_filter("must not be a configured currency", |code| {
        let upper = code.to_uppercase();
        upper != "EUR" && upper != "USD"
    })
}

fn engine() -> CalculationEngine {
    CalculationEngine::new(Arc::new(RateTable::default()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Unknown tiers are always rejected as an invalid insured amount.
    #[test]
    fn prop_unknown_tier_rejected(
        amount in unknown_tier(),
        currency in known_currency(),
        start in start_date(),
        days in 1u64..60,
    ) {
        let request = CalculationRequest::new(amount, start, start + Days::new(days), &currency);
        prop_assert_eq!(
            engine().calculate(&request),
            Err(CalculationError::InvalidInsuredAmount { amount })
        );
    }

    /// Unknown currencies are rejected after upper-casing.
    #[test]
    fn prop_unknown_currency_rejected(
        amount in known_tier(),
        currency in unknown_currency(),
        start in start_date(),
        days in 1u64..60,
    ) {
        let request = CalculationRequest::new(amount, start, start + Days::new(days), &currency);
        prop_assert_eq!(
            engine().calculate(&request),
            Err(CalculationError::InvalidCurrency { code: currency.to_uppercase() })
        );
    }

    /// An end date on or before the start date is always rejected.
    #[test]
    fn prop_non_increasing_dates_rejected(
        amount in known_tier(),
        currency in known_currency(),
        end in start_date(),
        back in 0u64..400,
    ) {
        let request = CalculationRequest::new(amount, end + Days::new(back), end, &currency);
        let is_date_range_error = matches!(
            engine().calculate(&request),
            Err(CalculationError::InvalidDateRange { .. })
        );
        prop_assert!(is_date_range_error);
    }

    /// Accepted requests span at least two days and the costs are exact products.
    #[test]
    fn prop_costs_are_exact_products(
        amount in known_tier(),
        currency in known_currency(),
        start in start_date(),
        days in 1u64..1_000,
    ) {
        let end = start + Days::new(days);
        let request = CalculationRequest::new(amount, start, end, &currency);
        let result = engine().calculate(&request).unwrap();

        prop_assert!(result.day_count >= 2);
        prop_assert_eq!(result.day_count, i64::try_from(days).unwrap() + 1);
        prop_assert_eq!(
            result.total_cost_in_currency,
            result.daily_coefficient * Decimal::from(result.day_count)
        );
        prop_assert_eq!(
            result.total_cost_in_preferred_currency,
            result.total_cost_in_currency * result.exchange_rate
        );
    }

    /// Repeating a calculation against an unchanged table yields the same result.
    #[test]
    fn prop_calculation_is_deterministic(
        amount in known_tier(),
        currency in known_currency(),
        start in start_date(),
        days in 1u64..1_000,
    ) {
        let engine = engine();
        let request = CalculationRequest::new(amount, start, start + Days::new(days), &currency);
        prop_assert_eq!(engine.calculate(&request), engine.calculate(&request));
    }
}
