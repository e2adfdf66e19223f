//! Deployment parameters for the exchange

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExchangeError, Result};
use crate::fees::FeeSchedule;
use crate::types::rate::{format_rate, parse_rate, FEE_SCALE};
use crate::types::Address;

/// Environment variable naming the fee recipient
pub const ENV_FEE_ACCOUNT: &str = "DEX_FEE_ACCOUNT";

/// Environment variable holding the maker fee as a decimal fraction
pub const ENV_MAKER_FEE_RATE: &str = "DEX_MAKER_FEE_RATE";

/// Environment variable holding the taker fee as a decimal fraction
pub const ENV_TAKER_FEE_RATE: &str = "DEX_TAKER_FEE_RATE";

/// Environment variable holding the order store pre-allocation
pub const ENV_ORDER_CAPACITY: &str = "DEX_ORDER_CAPACITY";

/// 1% in fixed point
const DEFAULT_FEE_RATE: u64 = FEE_SCALE / 100;

/// Exchange configuration
///
/// Rates are fixed-point with 18 decimals (`10^16` = 1%). In TOML they are
/// written as integers; in the environment as decimal fractions (`"0.01"`).
///
/// ```
/// use dark_exchange::ExchangeConfig;
///
/// let config: ExchangeConfig = toml::from_str(
///     r#"
///     fee_account = "0xfefefefefefefefefefefefefefefefefefefefefefefefefefefefefefefefe"
///     maker_fee_rate = 10000000000000000
///     taker_fee_rate = 20000000000000000
///     "#,
/// )
/// .unwrap();
///
/// let fees = config.fee_schedule().unwrap();
/// assert_eq!(fees.taker_fee(10_000), 200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Account credited with every fee
    pub fee_account: Address,

    /// Fee on what makers receive
    pub maker_fee_rate: u64,

    /// Fee on what takers receive
    pub taker_fee_rate: u64,

    /// Orders to pre-allocate in the store
    pub order_capacity: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            fee_account: Address::ZERO,
            maker_fee_rate: DEFAULT_FEE_RATE,
            taker_fee_rate: DEFAULT_FEE_RATE,
            order_capacity: 1_024,
        }
    }
}

impl ExchangeConfig {
    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ExchangeConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = ExchangeConfig::default();

        if let Ok(account) = std::env::var(ENV_FEE_ACCOUNT) {
            config.fee_account = account.parse().map_err(|e| {
                ExchangeError::InvalidConfig(format!("{}: {}", ENV_FEE_ACCOUNT, e))
            })?;
        }

        if let Ok(rate) = std::env::var(ENV_MAKER_FEE_RATE) {
            config.maker_fee_rate = env_rate(ENV_MAKER_FEE_RATE, &rate)?;
        }

        if let Ok(rate) = std::env::var(ENV_TAKER_FEE_RATE) {
            config.taker_fee_rate = env_rate(ENV_TAKER_FEE_RATE, &rate)?;
        }

        if let Ok(capacity) = std::env::var(ENV_ORDER_CAPACITY) {
            config.order_capacity = capacity.parse().map_err(|_| {
                ExchangeError::InvalidConfig(format!("{}: not a count: {}", ENV_ORDER_CAPACITY, capacity))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject rates above 100%
    pub fn validate(&self) -> Result<()> {
        self.fee_schedule().map(|_| ())
    }

    /// Fee schedule described by this config
    pub fn fee_schedule(&self) -> Result<FeeSchedule> {
        FeeSchedule::new(self.fee_account, self.maker_fee_rate, self.taker_fee_rate)
    }

    /// Human-readable rates, e.g. `("0.01", "0.01")`
    pub fn display_rates(&self) -> (String, String) {
        (format_rate(self.maker_fee_rate), format_rate(self.taker_fee_rate))
    }
}

fn env_rate(name: &str, value: &str) -> Result<u64> {
    parse_rate(value).ok_or_else(|| {
        ExchangeError::InvalidConfig(format!("{}: not a fee fraction in [0, 1]: {}", name, value))
    })
}

// ============================================================================
// Unit Tests
// ============================================================================
