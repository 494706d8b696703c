//! Execution engine seam: the host component that carries an arbitrage attempt
//! from request to a terminal close.

use crate::{connector::ConnectorRef, error::ExecutionError};
use kaspa_arb_instrument::{ExchangeId, InstrumentPair};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Terminal outcome of an attempt as reported by the execution engine.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseType {
    /// Both legs filled.
    Completed,
    /// The engine gave up on the attempt, eg/ a leg was rejected.
    Failed,
    /// Stopped by the engine before completion, eg/ on shutdown.
    EarlyStop,
    /// Timed out waiting for fills.
    Expired,
    /// A leg could not be funded at order time.
    InsufficientBalance,
}

impl Display for CloseType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CloseType::Completed => "COMPLETED",
            CloseType::Failed => "FAILED",
            CloseType::EarlyStop => "EARLY_STOP",
            CloseType::Expired => "EXPIRED",
            CloseType::InsufficientBalance => "INSUFFICIENT_BALANCE",
        };
        f.write_str(name)
    }
}

/// Description of one buy-on-X / sell-on-Y attempt handed to the engine.
#[derive(Debug, Clone)]
pub struct ArbitrageRequest {
    pub buying_market: ConnectorRef,
    pub selling_market: ConnectorRef,
    pub instrument: InstrumentPair,
    /// Base asset amount bought on one leg and sold on the other.
    pub order_amount: Decimal,
    /// Net profitability the engine must still see before placing orders.
    pub min_profitability: Decimal,
}

impl ArbitrageRequest {
    pub fn buy_exchange(&self) -> &ExchangeId {
        self.buying_market.exchange()
    }

    pub fn sell_exchange(&self) -> &ExchangeId {
        self.selling_market.exchange()
    }
}

/// Engine-owned view of a started attempt, polled by the strategy.
pub trait ExecutionHandle {
    /// True once the attempt reached a terminal [`CloseType`].
    fn is_closed(&self) -> bool;

    /// `Some` exactly when [`ExecutionHandle::is_closed`] is true.
    fn close_type(&self) -> Option<CloseType>;

    /// Human readable status line for the status report.
    fn status(&self) -> String;

    /// Realized quote-currency profit, for engines that track fills.
    fn realized_profit(&self) -> Option<Decimal> {
        None
    }
}

/// Accepts arbitrage attempt requests and starts driving them.
///
/// Once started, an attempt's retry and cancel behaviour is owned entirely by
/// the engine; the strategy only polls the returned handle.
pub trait ExecutionEngine {
    type Handle: ExecutionHandle;

    fn start(&mut self, request: ArbitrageRequest) -> Result<Self::Handle, ExecutionError>;
}
