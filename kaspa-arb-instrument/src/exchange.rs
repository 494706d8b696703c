use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Connector name of an exchange, eg/ "kucoin", "mexc", "gate_io".
///
/// Exchanges are identified by the name the host runtime registers their
/// connector under, so this is an open set rather than an enum.
#[derive(
    Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, From, Deserialize, Serialize,
)]
#[serde(transparent)]
pub struct ExchangeId(SmolStr);

impl ExchangeId {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ExchangeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ExchangeId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for ExchangeId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::borrow::Borrow<str> for ExchangeId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_id_display() {
        assert_eq!(ExchangeId::new("gate_io").to_string(), "gate_io");
    }

    #[test]
    fn test_exchange_id_borrow_lookup() {
        let mut slippage = std::collections::HashMap::new();
        slippage.insert(ExchangeId::new("mexc"), 15);

        assert_eq!(slippage.get("mexc"), Some(&15));
        assert_eq!(slippage.get("kraken"), None);
    }
}
