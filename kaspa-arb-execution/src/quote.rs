use kaspa_arb_instrument::{ExchangeId, InstrumentPair};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Best taker prices of one exchange for one instrument, fetched fresh per scan.
///
/// `bid_price` is what a taker sell receives, `ask_price` is what a taker buy pays.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quote {
    pub exchange: ExchangeId,
    pub instrument: InstrumentPair,
    pub bid_price: Decimal,
    pub ask_price: Decimal,
}

impl Quote {
    pub fn new(
        exchange: impl Into<ExchangeId>,
        instrument: InstrumentPair,
        bid_price: Decimal,
        ask_price: Decimal,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            instrument,
            bid_price,
            ask_price,
        }
    }
}
