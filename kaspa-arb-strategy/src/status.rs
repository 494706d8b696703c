//! Human readable status report of a running strategy.

use crate::opportunity::to_percent;
use crate::state::AttemptId;
use kaspa_arb_instrument::{ExchangeId, InstrumentPair};
use rust_decimal::Decimal;
use std::fmt::{Display, Formatter};

const RULE_WIDTH: usize = 60;

/// Snapshot of strategy configuration and in-flight attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub trading_pair: InstrumentPair,
    pub min_profitability: Decimal,
    pub order_amount: Decimal,
    pub max_concurrent_arbitrages: usize,
    pub connected_exchanges: Vec<ExchangeId>,
    /// Active attempt ids with the engine's status string, in dispatch order
    pub active: Vec<(AttemptId, String)>,
}

impl Display for StatusReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Kaspa Arbitrage Strategy Status")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Trading Pair: {}", self.trading_pair)?;
        writeln!(
            f,
            "Min Profitability: {:.2}%",
            to_percent(self.min_profitability)
        )?;
        writeln!(
            f,
            "Order Amount: {} {}",
            self.order_amount.normalize(),
            self.trading_pair.base
        )?;
        writeln!(
            f,
            "Active Arbitrages: {}/{}",
            self.active.len(),
            self.max_concurrent_arbitrages
        )?;

        writeln!(f)?;
        writeln!(f, "Connected Exchanges:")?;
        for exchange in &self.connected_exchanges {
            writeln!(f, "  - {exchange}")?;
        }

        if !self.active.is_empty() {
            writeln!(f)?;
            writeln!(f, "Active Arbitrage Positions:")?;
            for (id, status) in &self.active {
                writeln!(f, "  - {id}: {status}")?;
            }
        }

        writeln!(f, "{rule}")
    }
}
