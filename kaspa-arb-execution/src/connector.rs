//! Capability interface of an exchange connector, and the set of connected exchanges.

use crate::{error::ConnectorError, quote::Quote};
use indexmap::IndexMap;
use kaspa_arb_instrument::{AssetName, ExchangeId, InstrumentPair, Side};
use rust_decimal::Decimal;
use std::{fmt::Debug, sync::Arc};

/// Point-in-time market data and account queries against one exchange.
///
/// Implemented per exchange adapter by the host runtime. Calls are treated as
/// blocking requests that yield a value or a failure, and are never cancelled.
pub trait ExchangeConnector: Debug {
    /// Connector name this exchange is registered under.
    fn exchange(&self) -> &ExchangeId;

    /// Best taker price for `side`: the best ask for [`Side::Buy`], the best
    /// bid for [`Side::Sell`].
    ///
    /// `Ok(None)` means the book side is currently empty or stale, which is a
    /// transient condition rather than an error.
    fn fetch_price(
        &self,
        instrument: &InstrumentPair,
        side: Side,
    ) -> Result<Option<Decimal>, ConnectorError>;

    /// Balance of `asset` free to be committed to new orders.
    fn fetch_available_balance(&self, asset: &AssetName) -> Result<Decimal, ConnectorError>;

    /// Fetch both sides of the book. `Ok(None)` if either side is unavailable.
    fn fetch_quote(&self, instrument: &InstrumentPair) -> Result<Option<Quote>, ConnectorError> {
        let Some(bid_price) = self.fetch_price(instrument, Side::Sell)? else {
            return Ok(None);
        };
        let Some(ask_price) = self.fetch_price(instrument, Side::Buy)? else {
            return Ok(None);
        };

        Ok(Some(Quote::new(
            self.exchange().clone(),
            instrument.clone(),
            bid_price,
            ask_price,
        )))
    }
}

/// Shared handle to a connector, as held by the strategy and by attempt requests.
pub type ConnectorRef = Arc<dyn ExchangeConnector>;

/// Connected exchanges keyed by connector name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ConnectorMap {
    connectors: IndexMap<ExchangeId, ConnectorRef>,
}

impl ConnectorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connector under its own [`ExchangeConnector::exchange`] name,
    /// replacing any previous connector of that name.
    pub fn insert(&mut self, connector: ConnectorRef) -> Option<ConnectorRef> {
        let exchange = connector.exchange().clone();
        self.connectors.insert(exchange, connector)
    }

    pub fn get(&self, exchange: &ExchangeId) -> Option<&ConnectorRef> {
        self.connectors.get(exchange)
    }

    pub fn contains(&self, exchange: &ExchangeId) -> bool {
        self.connectors.contains_key(exchange)
    }

    pub fn exchanges(&self) -> impl Iterator<Item = &ExchangeId> {
        self.connectors.keys()
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}

impl FromIterator<ConnectorRef> for ConnectorMap {
    fn from_iter<T: IntoIterator<Item = ConnectorRef>>(iter: T) -> Self {
        let mut map = Self::new();
        for connector in iter {
            map.insert(connector);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockConnector;
    use rust_decimal_macros::dec;

    fn kas_usdt() -> InstrumentPair {
        InstrumentPair::new("KAS", "USDT")
    }

    #[test]
    fn test_fetch_quote_requires_both_sides() {
        let connector = MockConnector::new("kucoin");
        assert_eq!(connector.fetch_quote(&kas_usdt()), Ok(None));

        connector.set_bid(Some(dec!(0.12)));
        assert_eq!(connector.fetch_quote(&kas_usdt()), Ok(None));

        connector.set_ask(Some(dec!(0.121)));
        let quote = connector.fetch_quote(&kas_usdt()).unwrap().unwrap();
        assert_eq!(quote.exchange, ExchangeId::from("kucoin"));
        assert_eq!(quote.bid_price, dec!(0.12));
        assert_eq!(quote.ask_price, dec!(0.121));
    }

    #[test]
    fn test_connector_map_preserves_registration_order() {
        let map: ConnectorMap = ["mexc", "kucoin", "gate_io"]
            .into_iter()
            .map(|name| Arc::new(MockConnector::new(name)) as ConnectorRef)
            .collect();

        let names: Vec<_> = map.exchanges().map(ExchangeId::as_str).collect();
        assert_eq!(names, vec!["mexc", "kucoin", "gate_io"]);
        assert!(map.contains(&ExchangeId::from("kucoin")));
        assert!(!map.contains(&ExchangeId::from("kraken")));
    }
}
