//! Tariff tables: daily coefficients per insured-amount tier and exchange
//! rates per currency.
//!
//! The table is shared process-wide. Readers take an `Arc` to an immutable
//! [`TariffSnapshot`]; writers swap in a modified copy under a write lock, so
//! a lookup never sees a half-applied update. Last write wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::info;
use tripcover_shared::TariffConfig;

use super::error::RateTableError;

/// Immutable view of both tariff maps at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffSnapshot {
    daily_coefficients: BTreeMap<i64, Decimal>,
    exchange_rates: BTreeMap<String, Decimal>,
}

impl TariffSnapshot {
    /// Builds a snapshot from configuration.
    #[must_use]
    pub fn from_config(config: &TariffConfig) -> Self {
        Self {
            daily_coefficients: config.daily_coefficients.clone(),
            exchange_rates: config
                .exchange_rates
                .iter()
                .map(|(code, rate)| (code.to_uppercase(), *rate))
                .collect(),
        }
    }

    /// Looks up the daily coefficient for an insured amount.
    pub fn coefficient_for(&self, amount: i64) -> Result<Decimal, RateTableError> {
        self.daily_coefficients
            .get(&amount)
            .copied()
            .ok_or(RateTableError::UnknownTier(amount))
    }

    /// Looks up the exchange rate for an already normalized currency code.
    pub fn rate_for(&self, currency_code: &str) -> Result<Decimal, RateTableError> {
        self.exchange_rates
            .get(currency_code)
            .copied()
            .ok_or_else(|| RateTableError::UnknownCurrency(currency_code.to_string()))
    }

    /// Daily coefficients ordered by tier.
    #[must_use]
    pub const fn daily_coefficients(&self) -> &BTreeMap<i64, Decimal> {
        &self.daily_coefficients
    }

    /// Exchange rates ordered by currency code.
    #[must_use]
    pub const fn exchange_rates(&self) -> &BTreeMap<String, Decimal> {
        &self.exchange_rates
    }
}

impl Default for TariffSnapshot {
    fn default() -> Self {
        Self::from_config(&TariffConfig::default())
    }
}

/// Shared, updatable tariff table.
#[derive(Debug, Default)]
pub struct RateTable {
    current: RwLock<Arc<TariffSnapshot>>,
}

impl RateTable {
    /// Creates a table holding the given snapshot.
    #[must_use]
    pub fn new(snapshot: TariffSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Creates a table from configuration.
    #[must_use]
    pub fn from_config(config: &TariffConfig) -> Self {
        Self::new(TariffSnapshot::from_config(config))
    }

    /// Returns the current snapshot. It stays valid after later updates.
    #[must_use]
    pub fn snapshot(&self) -> Arc<TariffSnapshot> {
        Arc::clone(&*self.current.read())
    }

    /// Looks up the daily coefficient for an insured amount.
    pub fn coefficient_for(&self, amount: i64) -> Result<Decimal, RateTableError> {
        self.snapshot().coefficient_for(amount)
    }

    /// Looks up the exchange rate for an upper-case currency code.
    ///
    /// Lookup is case-sensitive; callers normalize the code first.
    pub fn rate_for(&self, currency_code: &str) -> Result<Decimal, RateTableError> {
        self.snapshot().rate_for(currency_code)
    }

    /// Inserts or overwrites the coefficient of a tier.
    ///
    /// The value is not validated.
    pub fn set_coefficient(&self, amount: i64, value: Decimal) {
        self.update(|tariff| {
            tariff.daily_coefficients.insert(amount, value);
        });
        info!(insurance_amount = amount, coefficient = %value, "Daily coefficient updated");
    }

    /// Inserts or overwrites the exchange rate of a currency.
    ///
    /// The code is stored upper-case. The value is not validated.
    pub fn set_rate(&self, currency_code: &str, value: Decimal) {
        let code = currency_code.trim().to_uppercase();
        self.update(|tariff| {
            tariff.exchange_rates.insert(code.clone(), value);
        });
        info!(currency = %code, rate = %value, "Exchange rate updated");
    }

    /// Replaces both maps at once.
    pub fn reload(&self, config: &TariffConfig) {
        let next = Arc::new(TariffSnapshot::from_config(config));
        *self.current.write() = next;
        info!(
            tiers = config.daily_coefficients.len(),
            currencies = config.exchange_rates.len(),
            "Tariff reloaded"
        );
    }

    /// Configured tiers in ascending order.
    #[must_use]
    pub fn tiers(&self) -> Vec<i64> {
        self.snapshot().daily_coefficients.keys().copied().collect()
    }

    /// Configured currency codes in ascending order.
    #[must_use]
    pub fn currencies(&self) -> Vec<String> {
        self.snapshot().exchange_rates.keys().cloned().collect()
    }

    /// Clone-on-write: snapshots already handed out are never touched.
    fn update(&self, apply: impl FnOnce(&mut TariffSnapshot)) {
        let mut guard = self.current.write();
        apply(Arc::make_mut(&mut *guard));
    }
}
