use crate::asset::AssetName;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

/// Separator between base and quote in an instrument symbol.
pub const SEPARATOR: char = '-';

/// Error parsing a `BASE-QUOTE` instrument symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstrumentParseError {
    #[error("instrument symbol '{0}' is not of the form BASE-QUOTE")]
    Malformed(String),
}

/// Spot market identified by its base and quote assets, eg/ "KAS-USDT".
///
/// The same symbol is used on every monitored exchange. The base asset is what
/// an arbitrage buys and sells, the quote asset is what it pays with.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstrumentPair {
    pub base: AssetName,
    pub quote: AssetName,
}

impl InstrumentPair {
    pub fn new(base: impl Into<AssetName>, quote: impl Into<AssetName>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }
}

impl FromStr for InstrumentPair {
    type Err = InstrumentParseError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        let malformed = || InstrumentParseError::Malformed(symbol.to_string());

        let (base, quote) = symbol.split_once(SEPARATOR).ok_or_else(malformed)?;
        let (base, quote) = (base.trim(), quote.trim());

        if base.is_empty() || quote.is_empty() || quote.contains(SEPARATOR) {
            return Err(malformed());
        }

        Ok(Self::new(base, quote))
    }
}

impl TryFrom<String> for InstrumentPair {
    type Error = InstrumentParseError;

    fn try_from(symbol: String) -> Result<Self, Self::Error> {
        symbol.parse()
    }
}

impl From<InstrumentPair> for String {
    fn from(instrument: InstrumentPair) -> Self {
        instrument.to_string()
    }
}

impl Display for InstrumentPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.base, SEPARATOR, self.quote)
    }
}
