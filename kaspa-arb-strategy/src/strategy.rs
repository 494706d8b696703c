//! Arbitrage coordinator: gates ticks on the check interval, reclaims closed
//! attempts, and dispatches fundable opportunities up to the concurrency cap.

use crate::{
    config::ArbitrageConfig,
    opportunity::ArbitrageOpportunity,
    risk::{ArbitrageRiskManager, RiskRefused},
    scanner::OpportunityScanner,
    state::{ActiveAttempts, ArbitrageAttempt, AttemptId, AttemptStatus, ClosedAttempt},
    status::StatusReport,
};
use chrono::{DateTime, Utc};
use kaspa_arb_execution::{
    ArbitrageRequest, CloseType, ConnectorMap, ExecutionEngine, ExecutionError, ExecutionHandle,
};
use kaspa_arb_instrument::ExchangeId;
use thiserror::Error;
use tracing::{error, info, warn};

/// What a call to [`KaspaArbitrageStrategy::on_tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Less than the check interval has elapsed since the last run.
    NotDue,
    /// Every slot is taken by an active attempt, even after reclaiming.
    AtCapacity,
    Ran {
        reclaimed: usize,
        found: usize,
        dispatched: usize,
    },
}

/// Failure to hand an approved opportunity to the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("{0} not connected")]
    NotConnected(ExchangeId),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Cross-exchange KAS arbitrage strategy.
///
/// Owns the active attempt set and is driven by a host calling
/// [`on_tick`](Self::on_tick) serially, typically far more often than the
/// configured check interval.
#[derive(Debug)]
pub struct KaspaArbitrageStrategy<Engine>
where
    Engine: ExecutionEngine,
{
    config: ArbitrageConfig,
    connectors: ConnectorMap,
    engine: Engine,
    risk: ArbitrageRiskManager,
    active: ActiveAttempts<Engine::Handle>,
    last_check: Option<DateTime<Utc>>,
    attempt_sequence: u64,
}

impl<Engine> KaspaArbitrageStrategy<Engine>
where
    Engine: ExecutionEngine,
{
    pub fn new(config: ArbitrageConfig, connectors: ConnectorMap, engine: Engine) -> Self {
        Self {
            risk: ArbitrageRiskManager::from_config(&config),
            config,
            connectors,
            engine,
            active: ActiveAttempts::default(),
            last_check: None,
            attempt_sequence: 0,
        }
    }

    pub fn config(&self) -> &ArbitrageConfig {
        &self.config
    }

    pub fn connectors(&self) -> &ConnectorMap {
        &self.connectors
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn active(&self) -> &ActiveAttempts<Engine::Handle> {
        &self.active
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn last_check(&self) -> Option<DateTime<Utc>> {
        self.last_check
    }

    /// True if the previous run was at least one check interval before `now`,
    /// or there has been no run yet.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.last_check
            .is_none_or(|last| now - last >= self.config.check_interval())
    }

    /// Run one coordinator step: reclaim, capacity gate, scan, balance gate
    /// and dispatch.
    ///
    /// Opportunities are considered in scan order. One refused by the balance
    /// gate, or rejected by the engine, is dropped for this tick and does not
    /// use up a slot.
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if !self.is_due(now) {
            return TickOutcome::NotDue;
        }
        self.last_check = Some(now);

        let reclaimed = self.reclaim_closed();

        let max = self.config.max_concurrent_arbitrages;
        if self.active.len() >= max {
            info!(
                active = self.active.len(),
                "Maximum concurrent arbitrages reached ({max})"
            );
            return TickOutcome::AtCapacity;
        }

        let opportunities = OpportunityScanner::new(&self.config).scan(&self.connectors);
        if !opportunities.is_empty() {
            info!("Found {} arbitrage opportunities", opportunities.len());
        }

        let capacity = max - self.active.len();
        let mut dispatched = 0;
        for opportunity in &opportunities {
            if dispatched == capacity {
                break;
            }

            if let Err(refused) =
                self.risk
                    .check(opportunity, &self.config.trading_pair, &self.connectors)
            {
                Self::log_refused(opportunity, &refused);
                continue;
            }

            match self.dispatch(opportunity, now) {
                Ok(_) => dispatched += 1,
                Err(error) => error!(
                    buy_exchange = %opportunity.buy_exchange,
                    sell_exchange = %opportunity.sell_exchange,
                    "Error executing arbitrage: {error}"
                ),
            }
        }

        TickOutcome::Ran {
            reclaimed,
            found: opportunities.len(),
            dispatched,
        }
    }

    /// Start an attempt for `opportunity` and track it as active.
    pub fn dispatch(
        &mut self,
        opportunity: &ArbitrageOpportunity,
        now: DateTime<Utc>,
    ) -> Result<AttemptId, DispatchError> {
        let connector = |exchange: &ExchangeId| {
            self.connectors
                .get(exchange)
                .cloned()
                .ok_or_else(|| DispatchError::NotConnected(exchange.clone()))
        };

        let request = ArbitrageRequest {
            buying_market: connector(&opportunity.buy_exchange)?,
            selling_market: connector(&opportunity.sell_exchange)?,
            instrument: self.config.trading_pair.clone(),
            order_amount: opportunity.amount,
            min_profitability: self.config.min_profitability,
        };

        let handle = self.engine.start(request)?;

        let id = AttemptId::new(
            &opportunity.buy_exchange,
            &opportunity.sell_exchange,
            now,
            self.attempt_sequence,
        );
        self.attempt_sequence += 1;

        let expected_profit_pct = opportunity.profit_pct();
        self.active.insert(ArbitrageAttempt {
            id: id.clone(),
            buy_exchange: opportunity.buy_exchange.clone(),
            sell_exchange: opportunity.sell_exchange.clone(),
            amount: opportunity.amount,
            start_time: now,
            status: AttemptStatus::Active,
            expected_profit_pct,
            handle,
        });

        info!(
            attempt = %id,
            buy_exchange = %opportunity.buy_exchange,
            sell_exchange = %opportunity.sell_exchange,
            amount = %opportunity.amount,
            expected_profit = %opportunity.expected_profit().round_dp(6),
            "Started arbitrage executor {id}: Buy {}, Sell {}, Amount: {} {}, Expected profit: {:.2}%",
            opportunity.buy_exchange,
            opportunity.sell_exchange,
            opportunity.amount,
            self.config.trading_pair.base,
            expected_profit_pct,
        );

        Ok(id)
    }

    /// Remove attempts the engine has closed, logging each outcome.
    fn reclaim_closed(&mut self) -> usize {
        let closed = self.active.reclaim();
        closed.iter().for_each(Self::log_closed);
        closed.len()
    }

    fn log_closed(closed: &ClosedAttempt<Engine::Handle>) {
        let id = &closed.attempt.id;
        let Some(close_type) = closed.close_type else {
            info!(attempt = %id, "Executor {id} closed without a close type");
            return;
        };
        info!(
            attempt = %id,
            %close_type,
            "Executor {id} closed with type: {close_type}"
        );

        match (close_type, closed.realized_profit) {
            (CloseType::Completed, Some(profit)) => {
                info!(attempt = %id, %profit, "Arbitrage completed successfully: {id}, profit: ${:.2}", profit);
            }
            (CloseType::Completed, None) => {
                info!(attempt = %id, "Arbitrage completed successfully: {id}");
            }
            (CloseType::Failed, _) => {
                warn!(attempt = %id, "Arbitrage failed: {id}");
            }
            (close_type, _) => {
                info!(attempt = %id, %close_type, "Attempt {id} reclaimed without completing");
            }
        }
    }

    fn log_refused(opportunity: &ArbitrageOpportunity, refused: &RiskRefused) {
        let (buy, sell) = (&opportunity.buy_exchange, &opportunity.sell_exchange);
        match refused {
            RiskRefused::InsufficientBalance { .. } => {
                warn!("{refused}");
                warn!(
                    buy_exchange = %buy,
                    sell_exchange = %sell,
                    "Insufficient balance for arbitrage between {buy} and {sell}"
                );
            }
            RiskRefused::NotConnected(exchange) => {
                warn!(%exchange, "Exchange {exchange} not connected, skipping opportunity");
            }
            RiskRefused::QuoteUnavailable(exchange) => {
                info!(%exchange, "No ask on {exchange} to size balance check, skipping opportunity");
            }
            RiskRefused::Connector(error) => {
                error!(buy_exchange = %buy, sell_exchange = %sell, "Error checking balances: {error}");
            }
        }
    }

    /// Snapshot of configuration, connected exchanges and active attempts.
    pub fn status_report(&self) -> StatusReport {
        StatusReport {
            trading_pair: self.config.trading_pair.clone(),
            min_profitability: self.config.min_profitability,
            order_amount: self.config.order_amount,
            max_concurrent_arbitrages: self.config.max_concurrent_arbitrages,
            connected_exchanges: self.connectors.exchanges().cloned().collect(),
            active: self
                .active
                .iter()
                .map(|attempt| (attempt.id.clone(), attempt.handle.status()))
                .collect(),
        }
    }

    pub fn format_status(&self) -> String {
        self.status_report().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pair::ExchangePair;
    use chrono::TimeDelta;
    use kaspa_arb_execution::{
        ConnectorRef,
        mock::{MockConnector, MockExecutionEngine},
    };
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn funded(name: &str, bid: rust_decimal::Decimal, ask: rust_decimal::Decimal) -> Arc<MockConnector> {
        Arc::new(
            MockConnector::new(name)
                .with_quote(bid, ask)
                .with_balance("USDT", dec!(1000))
                .with_balance("KAS", dec!(1000)),
        )
    }

    fn strategy(
        pairs: Vec<ExchangePair>,
        connectors: &[Arc<MockConnector>],
    ) -> (KaspaArbitrageStrategy<MockExecutionEngine>, MockExecutionEngine) {
        let config = ArbitrageConfig {
            exchange_pairs: pairs,
            ..ArbitrageConfig::default()
        };
        let connectors = connectors
            .iter()
            .map(|connector| -> ConnectorRef { connector.clone() })
            .collect();
        let engine = MockExecutionEngine::new();
        (
            KaspaArbitrageStrategy::new(config, connectors, engine.clone()),
            engine,
        )
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_first_tick_runs_and_dispatches() {
        let (mut strategy, engine) = strategy(
            vec![ExchangePair::new("kucoin", "kraken")],
            &[
                funded("kucoin", dec!(0.119), dec!(0.120)),
                funded("kraken", dec!(0.125), dec!(0.126)),
            ],
        );

        assert_eq!(
            strategy.on_tick(t0()),
            TickOutcome::Ran {
                reclaimed: 0,
                found: 1,
                dispatched: 1
            }
        );
        assert_eq!(engine.started_count(), 1);

        let request = &engine.requests()[0];
        assert_eq!(request.buy_exchange().as_str(), "kucoin");
        assert_eq!(request.sell_exchange().as_str(), "kraken");
        assert_eq!(request.order_amount, dec!(100));
        assert_eq!(request.min_profitability, dec!(0.005));

        let attempt = strategy.active().iter().next().unwrap();
        assert_eq!(attempt.id.as_str(), "kucoin_kraken_1700000000_0");
        assert_eq!(attempt.status, AttemptStatus::Active);
    }

    #[test]
    fn test_tick_gated_by_check_interval() {
        let (mut strategy, _) = strategy(vec![], &[]);

        assert!(matches!(strategy.on_tick(t0()), TickOutcome::Ran { .. }));
        assert_eq!(
            strategy.on_tick(t0() + TimeDelta::milliseconds(4_999)),
            TickOutcome::NotDue
        );
        assert_eq!(strategy.last_check(), Some(t0()));
        assert!(matches!(
            strategy.on_tick(t0() + TimeDelta::seconds(5)),
            TickOutcome::Ran { .. }
        ));
    }

    #[test]
    fn test_engine_rejection_does_not_consume_slot() {
        let (mut strategy, engine) = strategy(
            vec![ExchangePair::new("kucoin", "kraken")],
            &[
                funded("kucoin", dec!(0.119), dec!(0.120)),
                funded("kraken", dec!(0.125), dec!(0.126)),
            ],
        );
        engine.reject_next("engine paused");

        assert_eq!(
            strategy.on_tick(t0()),
            TickOutcome::Ran {
                reclaimed: 0,
                found: 1,
                dispatched: 0
            }
        );
        assert_eq!(strategy.active_count(), 0);
    }

    #[test]
    fn test_same_pair_same_second_ids_are_unique() {
        let (mut strategy, _) = strategy(
            vec![ExchangePair::new("kucoin", "kraken")],
            &[
                funded("kucoin", dec!(0.119), dec!(0.120)),
                funded("kraken", dec!(0.125), dec!(0.126)),
            ],
        );
        let opportunity = OpportunityScanner::new(strategy.config())
            .scan(strategy.connectors())
            .remove(0);

        let first = strategy.dispatch(&opportunity, t0()).unwrap();
        let second = strategy.dispatch(&opportunity, t0()).unwrap();

        assert_ne!(first, second);
        assert_eq!(strategy.active_count(), 2);
    }

    #[test]
    fn test_dispatch_unknown_exchange() {
        let (mut strategy, engine) = strategy(vec![], &[funded("kucoin", dec!(1), dec!(1))]);
        let opportunity = ArbitrageOpportunity {
            buy_exchange: ExchangeId::from("kucoin"),
            sell_exchange: ExchangeId::from("htx"),
            buy_price: dec!(0.12),
            sell_price: dec!(0.13),
            net_profit_fraction: dec!(0.05),
            amount: dec!(100),
            direction: crate::opportunity::ArbitrageDirection::FirstToSecond,
        };

        assert_eq!(
            strategy.dispatch(&opportunity, t0()),
            Err(DispatchError::NotConnected(ExchangeId::from("htx")))
        );
        assert_eq!(engine.started_count(), 0);
    }

    #[test]
    fn test_format_status_lists_active_attempt() {
        let (mut strategy, _) = strategy(
            vec![ExchangePair::new("kucoin", "kraken")],
            &[
                funded("kucoin", dec!(0.119), dec!(0.120)),
                funded("kraken", dec!(0.125), dec!(0.126)),
            ],
        );
        strategy.on_tick(t0());

        let status = strategy.format_status();
        assert!(status.contains("Active Arbitrages: 1/3"));
        assert!(status.contains("  - kucoin\n  - kraken\n"));
        assert!(status.contains("  - kucoin_kraken_1700000000_0: running\n"));
    }
}
