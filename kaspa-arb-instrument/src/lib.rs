//! Identifiers shared by the Kaspa cross-exchange arbitrage crates.
//!
//! - [`ExchangeId`]: connector name of a venue (eg/ "kucoin", "gate_io").
//! - [`AssetName`]: currency symbol (eg/ "KAS", "USDT").
//! - [`InstrumentPair`]: a `BASE-QUOTE` spot market traded identically on every venue.
//! - [`Side`]: taker side of an order.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod asset;
pub mod exchange;
pub mod instrument;

pub use asset::AssetName;
pub use exchange::ExchangeId;
pub use instrument::{InstrumentPair, InstrumentParseError};

/// Taker side of an order.
///
/// A [`Side::Buy`] lifts the best ask, a [`Side::Sell`] hits the best bid.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Buy.to_string(), "buy");
        assert_eq!(Side::Sell.to_string(), "sell");
    }
}
