//! Application configuration management.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de};

use crate::error::AppResult;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Tariff tables used by the premium calculator.
    #[serde(default)]
    pub tariff: TariffConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Tariff configuration: insured-amount tiers and exchange rates.
///
/// Sources merge key by key: a later source overrides or adds single entries
/// but cannot remove an entry defined by an earlier one. The built-in tables
/// apply only when no source defines the table at all.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TariffConfig {
    /// Daily coefficient per insured-amount tier.
    #[serde(
        default = "default_daily_coefficients",
        deserialize_with = "deserialize_tiers"
    )]
    pub daily_coefficients: BTreeMap<i64, Decimal>,
    /// Exchange rate into the preferred currency, keyed by upper-case code.
    #[serde(
        default = "default_exchange_rates",
        deserialize_with = "deserialize_rates"
    )]
    pub exchange_rates: BTreeMap<String, Decimal>,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            daily_coefficients: default_daily_coefficients(),
            exchange_rates: default_exchange_rates(),
        }
    }
}

fn default_daily_coefficients() -> BTreeMap<i64, Decimal> {
    BTreeMap::from([(30_000, Decimal::new(6, 1)), (50_000, Decimal::new(8, 1))])
}

fn default_exchange_rates() -> BTreeMap<String, Decimal> {
    BTreeMap::from([
        ("EUR".to_string(), Decimal::new(80, 0)),
        ("USD".to_string(), Decimal::new(70, 0)),
    ])
}

/// Config sources only produce string keys, so tiers are parsed here.
fn deserialize_tiers<'de, D>(deserializer: D) -> Result<BTreeMap<i64, Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Decimal>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, coefficient)| {
            key.trim()
                .parse::<i64>()
                .map(|tier| (tier, coefficient))
                .map_err(|_| de::Error::custom(format!("invalid insured amount tier `{key}`")))
        })
        .collect()
}

/// Environment sources lowercase keys; currency codes are stored upper-case.
///
/// Lower-case keys sort after upper-case ones, so an environment entry wins
/// over the same code spelled upper-case in a file.
fn deserialize_rates<'de, D>(deserializer: D) -> Result<BTreeMap<String, Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Decimal>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(code, rate)| (code.trim().to_uppercase(), rate))
        .collect())
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `TRIPCOVER__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> AppResult<Self> {
        Self::load_from(Path::new("config"))
    }

    /// Loads configuration with file sources read from `config_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load_from(config_dir: &Path) -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let default_file = config_dir.join("default");
        let mode_file = config_dir.join(&run_mode);

        let config = config::Config::builder()
            .add_source(config::File::with_name(&default_file.to_string_lossy()).required(false))
            .add_source(config::File::with_name(&mode_file.to_string_lossy()).required(false))
            .add_source(config::Environment::with_prefix("TRIPCOVER").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
