//! Paper execution engine: settles attempts against live quotes without
//! placing orders.

use crate::{
    connector::ConnectorRef,
    engine::{ArbitrageRequest, CloseType, ExecutionEngine, ExecutionHandle},
    error::{ConnectorError, ExecutionError},
};
use chrono::{DateTime, TimeDelta, Utc};
use kaspa_arb_instrument::{InstrumentPair, Side};
use rust_decimal::Decimal;
use std::cell::OnceCell;
use tracing::debug;

/// Starts paper attempts that settle `settle_after` after they were started.
///
/// On settlement both legs are re-priced at the then-current taker prices,
/// less `taker_fee` per leg. The attempt completes if that net return still
/// clears the request's `min_profitability`, and fails otherwise.
#[derive(Debug, Clone)]
pub struct PaperExecutionEngine {
    pub settle_after: TimeDelta,
    pub taker_fee: Decimal,
}

impl Default for PaperExecutionEngine {
    fn default() -> Self {
        Self {
            settle_after: TimeDelta::seconds(3),
            taker_fee: Decimal::new(1, 3), // 0.1%
        }
    }
}

impl ExecutionEngine for PaperExecutionEngine {
    type Handle = PaperAttemptHandle;

    fn start(&mut self, request: ArbitrageRequest) -> Result<Self::Handle, ExecutionError> {
        if request.order_amount <= Decimal::ZERO {
            return Err(ExecutionError::Rejected(format!(
                "order amount must be positive, got {}",
                request.order_amount
            )));
        }

        let started_at = Utc::now();
        debug!(
            buy_exchange = %request.buy_exchange(),
            sell_exchange = %request.sell_exchange(),
            amount = %request.order_amount,
            %started_at,
            "Paper attempt started"
        );

        Ok(PaperAttemptHandle {
            request,
            started_at,
            settle_at: started_at + self.settle_after,
            taker_fee: self.taker_fee,
            settlement: OnceCell::new(),
        })
    }
}

/// Result of settling a paper attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperSettlement {
    pub close_type: CloseType,
    pub buy_price: Option<Decimal>,
    pub sell_price: Option<Decimal>,
    pub realized_profit: Option<Decimal>,
}

/// Handle to a paper attempt. Settlement happens lazily on the first poll at
/// or after `settle_at`, and is fixed from then on.
#[derive(Debug)]
pub struct PaperAttemptHandle {
    request: ArbitrageRequest,
    started_at: DateTime<Utc>,
    settle_at: DateTime<Utc>,
    taker_fee: Decimal,
    settlement: OnceCell<PaperSettlement>,
}

impl PaperAttemptHandle {
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Settle if due at `now`, returning the settlement once one exists.
    pub fn poll(&self, now: DateTime<Utc>) -> Option<&PaperSettlement> {
        if let Some(settlement) = self.settlement.get() {
            return Some(settlement);
        }
        if now < self.settle_at {
            return None;
        }
        Some(self.settlement.get_or_init(|| self.settle()))
    }

    fn settle(&self) -> PaperSettlement {
        let instrument = &self.request.instrument;
        let prices = fetch_leg_prices(
            &self.request.buying_market,
            &self.request.selling_market,
            instrument,
        );

        let (buy_price, sell_price) = match prices {
            Ok((Some(buy), Some(sell))) => (buy, sell),
            Ok((buy, sell)) => {
                return PaperSettlement {
                    close_type: CloseType::Failed,
                    buy_price: buy,
                    sell_price: sell,
                    realized_profit: None,
                };
            }
            Err(error) => {
                debug!(%error, "Paper attempt could not re-price legs");
                return PaperSettlement {
                    close_type: CloseType::Failed,
                    buy_price: None,
                    sell_price: None,
                    realized_profit: None,
                };
            }
        };

        let cost = buy_price * (Decimal::ONE + self.taker_fee);
        let proceeds = sell_price * (Decimal::ONE - self.taker_fee);
        let net_return = if cost > Decimal::ZERO {
            (proceeds - cost) / cost
        } else {
            Decimal::ZERO
        };

        if net_return >= self.request.min_profitability {
            PaperSettlement {
                close_type: CloseType::Completed,
                buy_price: Some(buy_price),
                sell_price: Some(sell_price),
                realized_profit: Some((proceeds - cost) * self.request.order_amount),
            }
        } else {
            PaperSettlement {
                close_type: CloseType::Failed,
                buy_price: Some(buy_price),
                sell_price: Some(sell_price),
                realized_profit: None,
            }
        }
    }
}

/// Ask on the buying market and bid on the selling market.
fn fetch_leg_prices(
    buying_market: &ConnectorRef,
    selling_market: &ConnectorRef,
    instrument: &InstrumentPair,
) -> Result<(Option<Decimal>, Option<Decimal>), ConnectorError> {
    let buy = buying_market.fetch_price(instrument, Side::Buy)?;
    let sell = selling_market.fetch_price(instrument, Side::Sell)?;
    Ok((buy, sell))
}

impl ExecutionHandle for PaperAttemptHandle {
    fn is_closed(&self) -> bool {
        self.poll(Utc::now()).is_some()
    }

    fn close_type(&self) -> Option<CloseType> {
        self.poll(Utc::now()).map(|settlement| settlement.close_type)
    }

    fn status(&self) -> String {
        match self.settlement.get() {
            Some(settlement) => format!("closed ({})", settlement.close_type),
            None => format!(
                "buying {} {} on {} / selling on {}, started {}",
                self.request.order_amount,
                self.request.instrument.base,
                self.request.buy_exchange(),
                self.request.sell_exchange(),
                self.started_at.format("%H:%M:%S"),
            ),
        }
    }

    fn realized_profit(&self) -> Option<Decimal> {
        self.settlement
            .get()
            .and_then(|settlement| settlement.realized_profit)
    }
}
