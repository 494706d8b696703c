//! Cross-exchange KAS arbitrage strategy.
//!
//! This crate scans configured exchange pairs for price discrepancies on a
//! single instrument, checks that both legs can be funded, and hands
//! qualifying opportunities to an execution engine while capping the number
//! of attempts in flight.
//!
//! # Key Components
//!
//! - [`KaspaArbitrageStrategy`]: Coordinator driven by the host's tick
//! - [`OpportunityScanner`]: Evaluates both directions of every exchange pair
//! - [`FeeCalculator`]: Slippage and taker fee adjusted profitability
//! - [`ArbitrageRiskManager`]: Quote and base balance gate
//! - [`ArbitrageConfig`]: Serde/TOML configuration with validated defaults
//! - [`logging`]: Timestamp-prefixed plain text log output
//!
//! # Example
//!
//! ```rust,ignore
//! use kaspa_arb_execution::{mock::MockConnector, paper::PaperExecutionEngine, ConnectorRef};
//! use kaspa_arb_strategy::{ArbitrageConfig, KaspaArbitrageStrategy};
//! use std::sync::Arc;
//!
//! let config = ArbitrageConfig::load("config.toml")?;
//! let connectors = ["kucoin", "kraken"]
//!     .into_iter()
//!     .map(|name| -> ConnectorRef { Arc::new(MockConnector::new(name)) })
//!     .collect();
//!
//! let mut strategy =
//!     KaspaArbitrageStrategy::new(config, connectors, PaperExecutionEngine::default());
//!
//! // Called by the host at a fixed cadence, the strategy enforces its own
//! // check interval.
//! strategy.on_tick(chrono::Utc::now());
//! println!("{}", strategy.format_status());
//! ```
//!
//! # Profitability Model
//!
//! ```text
//! adjusted_buy  = buy_ask  * (1 + slippage_buy)
//! adjusted_sell = sell_bid * (1 - slippage_sell)
//! net           = (adjusted_sell - adjusted_buy) / adjusted_buy - fee_buy - fee_sell
//! ```

pub mod config;
pub mod fees;
pub mod logging;
pub mod opportunity;
pub mod pair;
pub mod risk;
pub mod scanner;
pub mod state;
pub mod status;
pub mod strategy;

// Re-exports for convenience
pub use config::{ArbitrageConfig, ConfigError};
pub use fees::{FeeCalculator, LegCosts};
pub use opportunity::{ArbitrageDirection, ArbitrageOpportunity};
pub use pair::ExchangePair;
pub use risk::{ArbitrageRiskManager, RiskApproved, RiskRefused};
pub use scanner::{OpportunityScanner, ScanError};
pub use state::{ActiveAttempts, ArbitrageAttempt, AttemptId, AttemptStatus, ClosedAttempt};
pub use status::StatusReport;
pub use strategy::{DispatchError, KaspaArbitrageStrategy, TickOutcome};
