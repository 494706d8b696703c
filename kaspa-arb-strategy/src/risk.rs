//! Balance gate for arbitrage attempts.
//!
//! Validates that both legs of an opportunity can be funded before any
//! capital is committed.

use crate::{config::ArbitrageConfig, fees::FeeCalculator, opportunity::ArbitrageOpportunity};
use kaspa_arb_execution::{ConnectorError, ConnectorMap};
use kaspa_arb_instrument::{AssetName, ExchangeId, InstrumentPair, Side};
use rust_decimal::Decimal;
use thiserror::Error;

/// Reason an opportunity was refused by the balance gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RiskRefused {
    #[error("{0} not connected")]
    NotConnected(ExchangeId),

    #[error("no ask price on {0} to size the required quote balance")]
    QuoteUnavailable(ExchangeId),

    #[error("Insufficient {asset} balance on {exchange}: {available} < {required}")]
    InsufficientBalance {
        exchange: ExchangeId,
        asset: AssetName,
        available: Decimal,
        required: Decimal,
    },

    #[error(transparent)]
    Connector(#[from] ConnectorError),
}

/// Balances confirmed by an approved check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskApproved {
    /// Quote currency needed on the buy exchange, including the buffer
    pub required_quote: Decimal,
    /// Quote currency available on the buy exchange
    pub quote_available: Decimal,
    /// Base currency available on the sell exchange
    pub base_available: Decimal,
}

/// Risk manager enforcing balance sufficiency on both legs.
#[derive(Debug, Clone)]
pub struct ArbitrageRiskManager {
    /// Headroom over `amount * ask` required in quote currency (eg/ 0.01 = 1%)
    pub balance_buffer: Decimal,
}

impl Default for ArbitrageRiskManager {
    fn default() -> Self {
        Self {
            balance_buffer: Decimal::new(1, 2),
        }
    }
}

impl ArbitrageRiskManager {
    pub fn from_config(config: &ArbitrageConfig) -> Self {
        Self {
            balance_buffer: config.balance_buffer,
        }
    }

    /// Check the buy exchange holds enough quote currency to buy
    /// `opportunity.amount` at its current ask (plus buffer), then that the
    /// sell exchange holds `opportunity.amount` of the base currency.
    ///
    /// The ask is re-fetched rather than taken from the opportunity, since the
    /// book may have moved since the scan.
    pub fn check(
        &self,
        opportunity: &ArbitrageOpportunity,
        instrument: &InstrumentPair,
        connectors: &ConnectorMap,
    ) -> Result<RiskApproved, RiskRefused> {
        let buy_connector = connectors
            .get(&opportunity.buy_exchange)
            .ok_or_else(|| RiskRefused::NotConnected(opportunity.buy_exchange.clone()))?;
        let sell_connector = connectors
            .get(&opportunity.sell_exchange)
            .ok_or_else(|| RiskRefused::NotConnected(opportunity.sell_exchange.clone()))?;

        let quote_available = buy_connector.fetch_available_balance(&instrument.quote)?;
        let ask_price = buy_connector
            .fetch_price(instrument, Side::Buy)?
            .ok_or_else(|| RiskRefused::QuoteUnavailable(opportunity.buy_exchange.clone()))?;
        let required_quote =
            FeeCalculator::required_quote_balance(opportunity.amount, ask_price, self.balance_buffer);

        if quote_available < required_quote {
            return Err(RiskRefused::InsufficientBalance {
                exchange: opportunity.buy_exchange.clone(),
                asset: instrument.quote.clone(),
                available: quote_available,
                required: required_quote,
            });
        }

        let base_available = sell_connector.fetch_available_balance(&instrument.base)?;
        if base_available < opportunity.amount {
            return Err(RiskRefused::InsufficientBalance {
                exchange: opportunity.sell_exchange.clone(),
                asset: instrument.base.clone(),
                available: base_available,
                required: opportunity.amount,
            });
        }

        Ok(RiskApproved {
            required_quote,
            quote_available,
            base_available,
        })
    }
}
