//! Exchange pairs monitored together for price discrepancies.

use kaspa_arb_instrument::ExchangeId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Two exchanges compared against each other on every scan.
///
/// The pair is unordered for arbitrage purposes: both buy-on-first /
/// sell-on-second and the reverse are evaluated. The stored order only fixes
/// which direction is evaluated first.
///
/// Deserializes from a two element array, eg/ `["kucoin", "kraken"]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "(ExchangeId, ExchangeId)", into = "(ExchangeId, ExchangeId)")]
pub struct ExchangePair {
    pub first: ExchangeId,
    pub second: ExchangeId,
}

impl ExchangePair {
    pub fn new(first: impl Into<ExchangeId>, second: impl Into<ExchangeId>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Check if both sides name the same exchange.
    pub fn is_degenerate(&self) -> bool {
        self.first == self.second
    }

    /// The two trade directions, first-buy direction first.
    pub fn directions(&self) -> [(&ExchangeId, &ExchangeId); 2] {
        [(&self.first, &self.second), (&self.second, &self.first)]
    }
}

impl From<(ExchangeId, ExchangeId)> for ExchangePair {
    fn from((first, second): (ExchangeId, ExchangeId)) -> Self {
        Self { first, second }
    }
}

impl From<ExchangePair> for (ExchangeId, ExchangeId) {
    fn from(pair: ExchangePair) -> Self {
        (pair.first, pair.second)
    }
}

impl Display for ExchangePair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.first, self.second)
    }
}
