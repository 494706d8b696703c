//! Configuration types for the Kaspa cross-exchange arbitrage strategy.

use crate::pair::ExchangePair;
use chrono::TimeDelta;
use indexmap::IndexMap;
use kaspa_arb_instrument::{ExchangeId, InstrumentPair};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading or validating an [`ArbitrageConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the cross-exchange arbitrage strategy.
///
/// Static for the lifetime of the process. Every field has a default, so a
/// TOML file only needs the values it changes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArbitrageConfig {
    /// Instrument traded on every exchange (eg/ "KAS-USDT")
    pub trading_pair: InstrumentPair,
    /// Exchange pairs to monitor, in scan order
    pub exchange_pairs: Vec<ExchangePair>,
    /// Minimum net profitability to act on (eg/ 0.005 = 0.5%)
    pub min_profitability: Decimal,
    /// Order amount per attempt, in base asset units
    pub order_amount: Decimal,
    /// Maximum number of attempts in flight at once
    pub max_concurrent_arbitrages: usize,
    /// Minimum seconds between two strategy runs
    pub check_interval_secs: f64,
    /// Per exchange slippage buffer (fraction)
    pub slippage_buffers: IndexMap<ExchangeId, Decimal>,
    /// Slippage buffer for exchanges absent from `slippage_buffers`
    pub default_slippage_buffer: Decimal,
    /// Per exchange taker fee (fraction)
    pub taker_fees: IndexMap<ExchangeId, Decimal>,
    /// Taker fee for exchanges absent from `taker_fees`
    pub default_taker_fee: Decimal,
    /// Extra quote balance required over `amount * ask` (eg/ 0.01 = 1%)
    pub balance_buffer: Decimal,
}

impl Default for ArbitrageConfig {
    fn default() -> Self {
        Self {
            trading_pair: InstrumentPair::new("KAS", "USDT"),
            exchange_pairs: vec![
                ExchangePair::new("kucoin", "kraken"),
                ExchangePair::new("kucoin", "bybit"),
                ExchangePair::new("mexc", "gate_io"),
                ExchangePair::new("bitget", "kucoin"),
            ],
            min_profitability: Decimal::new(5, 3), // 0.5%
            order_amount: Decimal::new(100, 0),
            max_concurrent_arbitrages: 3,
            check_interval_secs: 5.0,
            slippage_buffers: IndexMap::from([
                (ExchangeId::from("kucoin"), Decimal::new(1, 3)),
                (ExchangeId::from("kraken"), Decimal::new(1, 3)),
                (ExchangeId::from("bybit"), Decimal::new(1, 3)),
                (ExchangeId::from("mexc"), Decimal::new(15, 4)), // thinner book
                (ExchangeId::from("gate_io"), Decimal::new(1, 3)),
                (ExchangeId::from("bitget"), Decimal::new(1, 3)),
            ]),
            default_slippage_buffer: Decimal::new(1, 3), // 0.1%
            taker_fees: IndexMap::new(),
            default_taker_fee: Decimal::new(1, 3), // 0.1%
            balance_buffer: Decimal::new(1, 2),    // 1%
        }
    }
}

impl ArbitrageConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML config text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exchange_pairs.is_empty() {
            return Err(ConfigError::Invalid("exchange_pairs cannot be empty".into()));
        }
        if let Some(pair) = self.exchange_pairs.iter().find(|pair| pair.is_degenerate()) {
            return Err(ConfigError::Invalid(format!(
                "exchange pair {pair} names the same exchange twice"
            )));
        }
        if self.order_amount <= Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "order_amount must be positive, got {}",
                self.order_amount
            )));
        }
        if self.max_concurrent_arbitrages == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_arbitrages must be at least 1".into(),
            ));
        }
        if !self.check_interval_secs.is_finite() || self.check_interval_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "check_interval_secs must be a non-negative number, got {}",
                self.check_interval_secs
            )));
        }
        if self.balance_buffer < Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "balance_buffer cannot be negative, got {}",
                self.balance_buffer
            )));
        }

        let fractions = self
            .slippage_buffers
            .iter()
            .map(|(exchange, value)| (format!("slippage_buffers.{exchange}"), *value))
            .chain(
                self.taker_fees
                    .iter()
                    .map(|(exchange, value)| (format!("taker_fees.{exchange}"), *value)),
            )
            .chain([
                ("default_slippage_buffer".to_string(), self.default_slippage_buffer),
                ("default_taker_fee".to_string(), self.default_taker_fee),
            ]);

        for (name, value) in fractions {
            if value < Decimal::ZERO || value >= Decimal::ONE {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1), got {value}"
                )));
            }
        }

        Ok(())
    }

    /// Slippage buffer applied to prices on `exchange`.
    pub fn slippage_buffer(&self, exchange: &ExchangeId) -> Decimal {
        self.slippage_buffers
            .get(exchange)
            .copied()
            .unwrap_or(self.default_slippage_buffer)
    }

    /// Taker fee charged by `exchange` on one leg.
    pub fn taker_fee(&self, exchange: &ExchangeId) -> Decimal {
        self.taker_fees
            .get(exchange)
            .copied()
            .unwrap_or(self.default_taker_fee)
    }

    /// Minimum time between two strategy runs.
    pub fn check_interval(&self) -> TimeDelta {
        TimeDelta::milliseconds((self.check_interval_secs * 1000.0).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = ArbitrageConfig::default();
        assert_eq!(config.trading_pair.to_string(), "KAS-USDT");
        assert_eq!(config.exchange_pairs.len(), 4);
        assert_eq!(config.min_profitability, dec!(0.005));
        assert_eq!(config.order_amount, dec!(100));
        assert_eq!(config.max_concurrent_arbitrages, 3);
        assert_eq!(config.check_interval(), TimeDelta::seconds(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_slippage_and_fee_fallbacks() {
        let mut config = ArbitrageConfig::default();
        config
            .taker_fees
            .insert(ExchangeId::from("kraken"), dec!(0.0026));

        assert_eq!(config.slippage_buffer(&ExchangeId::from("mexc")), dec!(0.0015));
        assert_eq!(config.slippage_buffer(&ExchangeId::from("htx")), dec!(0.001));
        assert_eq!(config.taker_fee(&ExchangeId::from("kraken")), dec!(0.0026));
        assert_eq!(config.taker_fee(&ExchangeId::from("kucoin")), dec!(0.001));
    }

    #[test]
    fn test_from_toml_partial_overrides() {
        let config = ArbitrageConfig::from_toml_str(
            r#"
            trading_pair = "KAS-USDC"
            exchange_pairs = [["kucoin", "mexc"]]
            min_profitability = "0.004"
            check_interval_secs = 2.5

            [slippage_buffers]
            mexc = "0.002"
            "#,
        )
        .unwrap();

        assert_eq!(config.trading_pair, InstrumentPair::new("KAS", "USDC"));
        assert_eq!(config.exchange_pairs, vec![ExchangePair::new("kucoin", "mexc")]);
        assert_eq!(config.min_profitability, dec!(0.004));
        assert_eq!(config.check_interval(), TimeDelta::milliseconds(2500));
        assert_eq!(config.slippage_buffer(&ExchangeId::from("mexc")), dec!(0.002));
        // Untouched fields keep their defaults
        assert_eq!(config.order_amount, dec!(100));
        assert_eq!(config.max_concurrent_arbitrages, 3);
    }

    #[test]
    fn test_example_config_file_parses() {
        let config =
            ArbitrageConfig::from_toml_str(include_str!("../config.example.toml")).unwrap();
        assert_eq!(config.exchange_pairs.len(), 4);
        assert_eq!(config.taker_fee(&ExchangeId::from("kraken")), dec!(0.0026));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases: [(&str, fn(&mut ArbitrageConfig)); 8] = [
            ("empty pairs", |c: &mut ArbitrageConfig| c.exchange_pairs.clear()),
            ("degenerate pair", |c: &mut ArbitrageConfig| {
                c.exchange_pairs.push(ExchangePair::new("mexc", "mexc"))
            }),
            ("zero amount", |c: &mut ArbitrageConfig| c.order_amount = Decimal::ZERO),
            ("zero capacity", |c: &mut ArbitrageConfig| c.max_concurrent_arbitrages = 0),
            ("negative interval", |c: &mut ArbitrageConfig| c.check_interval_secs = -1.0),
            ("nan interval", |c: &mut ArbitrageConfig| c.check_interval_secs = f64::NAN),
            ("slippage of one", |c: &mut ArbitrageConfig| {
                c.slippage_buffers.insert(ExchangeId::from("kraken"), Decimal::ONE);
            }),
            ("negative fee", |c: &mut ArbitrageConfig| c.default_taker_fee = dec!(-0.001)),
        ];

        for (name, mutate) in cases {
            let mut config = ArbitrageConfig::default();
            mutate(&mut config);
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_instrument_fails_parse() {
        let result = ArbitrageConfig::from_toml_str(r#"trading_pair = "KASUSDT""#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
