//! Opportunity scanner: compares taker quotes across every configured
//! exchange pair, in both directions.

use crate::{
    config::ArbitrageConfig,
    fees::{FeeCalculator, LegCosts},
    opportunity::{ArbitrageDirection, ArbitrageOpportunity},
    pair::ExchangePair,
};
use kaspa_arb_execution::{ConnectorError, ConnectorMap, Quote};
use kaspa_arb_instrument::ExchangeId;
use thiserror::Error;
use tracing::{error, info, warn};

/// Reason a single exchange pair produced no opportunities this scan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("exchange pair {pair} not connected: {missing} has no connector")]
    NotConnected {
        pair: ExchangePair,
        missing: ExchangeId,
    },

    #[error("no two-sided quote on {0}")]
    QuoteUnavailable(ExchangeId),

    #[error(transparent)]
    Connector(#[from] ConnectorError),
}

/// Scans exchange pairs for opportunities clearing `min_profitability`.
#[derive(Debug, Clone, Copy)]
pub struct OpportunityScanner<'a> {
    config: &'a ArbitrageConfig,
}

impl<'a> OpportunityScanner<'a> {
    pub fn new(config: &'a ArbitrageConfig) -> Self {
        Self { config }
    }

    /// Scan every configured pair.
    ///
    /// Opportunities are returned in discovery order: pair order, then the
    /// buy-first direction before the reverse. They are neither de-duplicated
    /// nor sorted by profit. A pair that fails is logged and skipped; it never
    /// stops the scan of the remaining pairs.
    pub fn scan(&self, connectors: &ConnectorMap) -> Vec<ArbitrageOpportunity> {
        let mut opportunities = Vec::new();

        for pair in &self.config.exchange_pairs {
            match self.scan_pair(pair, connectors) {
                Ok(found) => opportunities.extend(found),
                Err(ScanError::NotConnected { pair, missing }) => {
                    warn!(%pair, %missing, "Exchange pair {pair} not connected");
                }
                Err(ScanError::QuoteUnavailable(exchange)) => {
                    info!(%pair, %exchange, "Quote unavailable on {exchange}, skipping pair {pair} this tick");
                }
                Err(ScanError::Connector(error)) => {
                    error!(%pair, %error, "Error checking arbitrage pair {pair}: {error}");
                }
            }
        }

        opportunities
    }

    /// Evaluate both directions of one pair.
    pub fn scan_pair(
        &self,
        pair: &ExchangePair,
        connectors: &ConnectorMap,
    ) -> Result<Vec<ArbitrageOpportunity>, ScanError> {
        let [first, second] = [&pair.first, &pair.second].map(|exchange| {
            connectors
                .get(exchange)
                .ok_or_else(|| ScanError::NotConnected {
                    pair: pair.clone(),
                    missing: exchange.clone(),
                })
        });
        let (first, second) = (first?, second?);

        let instrument = &self.config.trading_pair;
        let first_quote = first
            .fetch_quote(instrument)?
            .ok_or_else(|| ScanError::QuoteUnavailable(pair.first.clone()))?;
        let second_quote = second
            .fetch_quote(instrument)?
            .ok_or_else(|| ScanError::QuoteUnavailable(pair.second.clone()))?;
        let quotes = [first_quote, second_quote];

        let opportunities = pair
            .directions()
            .into_iter()
            .zip([
                ArbitrageDirection::FirstToSecond,
                ArbitrageDirection::SecondToFirst,
            ])
            .filter_map(|((buy, sell), direction)| {
                let buy_quote = quotes.iter().find(|quote| &quote.exchange == buy)?;
                let sell_quote = quotes.iter().find(|quote| &quote.exchange == sell)?;
                self.evaluate(buy_quote, sell_quote, direction)
            })
            .inspect(|opp| {
                info!(
                    pair = %pair,
                    buy_exchange = %opp.buy_exchange,
                    sell_exchange = %opp.sell_exchange,
                    buy_price = %opp.buy_price,
                    sell_price = %opp.sell_price,
                    net = %opp.net_profit_fraction,
                    "Arbitrage opportunity: Buy {} @ {}, Sell {} @ {}, Profit: {:.2}%",
                    opp.buy_exchange,
                    opp.buy_price,
                    opp.sell_exchange,
                    opp.sell_price,
                    opp.profit_pct(),
                );
            })
            .collect();

        Ok(opportunities)
    }

    /// Buy at `buy_quote`'s ask, sell at `sell_quote`'s bid. `Some` only if the
    /// net profitability clears the configured minimum.
    pub fn evaluate(
        &self,
        buy_quote: &Quote,
        sell_quote: &Quote,
        direction: ArbitrageDirection,
    ) -> Option<ArbitrageOpportunity> {
        let buy_costs = self.leg_costs(&buy_quote.exchange);
        let sell_costs = self.leg_costs(&sell_quote.exchange);

        let net = FeeCalculator::net_profitability(
            buy_quote.ask_price,
            sell_quote.bid_price,
            buy_costs,
            sell_costs,
        )?;

        let opportunity = ArbitrageOpportunity {
            buy_exchange: buy_quote.exchange.clone(),
            sell_exchange: sell_quote.exchange.clone(),
            buy_price: buy_quote.ask_price,
            sell_price: sell_quote.bid_price,
            net_profit_fraction: net,
            amount: self.config.order_amount,
            direction,
        };

        opportunity
            .meets_threshold(self.config.min_profitability)
            .then_some(opportunity)
    }

    fn leg_costs(&self, exchange: &ExchangeId) -> LegCosts {
        LegCosts::new(
            self.config.slippage_buffer(exchange),
            self.config.taker_fee(exchange),
        )
    }
}
