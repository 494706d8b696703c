//! Arbitrage opportunity detection results.

use crate::fees::FeeCalculator;
use kaspa_arb_instrument::ExchangeId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which way round an [`ExchangePair`](crate::pair::ExchangePair) is traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ArbitrageDirection {
    /// Buy on the pair's first exchange, sell on the second
    FirstToSecond,
    /// Buy on the pair's second exchange, sell on the first
    SecondToFirst,
}

/// A buy-low / sell-high discrepancy found by one scan.
///
/// Transient: consumed by the same tick that found it, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArbitrageOpportunity {
    /// Exchange to buy on (lifting its ask)
    pub buy_exchange: ExchangeId,
    /// Exchange to sell on (hitting its bid)
    pub sell_exchange: ExchangeId,
    /// Best ask on the buy exchange
    pub buy_price: Decimal,
    /// Best bid on the sell exchange
    pub sell_price: Decimal,
    /// Net profitability after slippage and fees (fraction)
    pub net_profit_fraction: Decimal,
    /// Base asset amount to trade
    pub amount: Decimal,
    pub direction: ArbitrageDirection,
}

impl ArbitrageOpportunity {
    /// Check if this opportunity meets a minimum profitability threshold.
    pub fn meets_threshold(&self, min_profitability: Decimal) -> bool {
        self.net_profit_fraction >= min_profitability
    }

    /// Expected profit in quote currency at the quoted prices.
    pub fn expected_profit(&self) -> Decimal {
        FeeCalculator::expected_profit(self.amount, self.buy_price, self.net_profit_fraction)
    }

    /// Net profitability as a percentage rounded to 2dp, eg/ 0.015962 -> 1.60.
    pub fn profit_pct(&self) -> Decimal {
        to_percent(self.net_profit_fraction)
    }
}

/// Fraction as a percentage rounded to 2dp, eg/ 0.005 -> 0.50.
pub fn to_percent(fraction: Decimal) -> Decimal {
    (fraction * Decimal::ONE_HUNDRED).round_dp(2)
}
