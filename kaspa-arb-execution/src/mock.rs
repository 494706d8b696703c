//! Scriptable in-memory connector and execution engine.
//!
//! Used by tests to drive the strategy deterministically, and by the paper
//! trading example as the market data source.

use crate::{
    connector::ExchangeConnector,
    engine::{ArbitrageRequest, CloseType, ExecutionEngine, ExecutionHandle},
    error::{ConnectorError, ExecutionError},
};
use kaspa_arb_instrument::{AssetName, ExchangeId, InstrumentPair, Side};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::{collections::HashMap, sync::Arc};

#[derive(Debug, Default)]
struct MockConnectorState {
    bid: Option<Decimal>,
    ask: Option<Decimal>,
    balances: HashMap<AssetName, Decimal>,
    failure: Option<String>,
}

/// In-memory [`ExchangeConnector`] with settable top of book and balances.
///
/// Quotes are the same for every instrument. Assets that were never given a
/// balance are reported as [`ConnectorError::UnknownAsset`].
#[derive(Debug)]
pub struct MockConnector {
    exchange: ExchangeId,
    state: Mutex<MockConnectorState>,
}

impl MockConnector {
    pub fn new(exchange: impl Into<ExchangeId>) -> Self {
        Self {
            exchange: exchange.into(),
            state: Mutex::new(MockConnectorState::default()),
        }
    }

    pub fn with_quote(self, bid: Decimal, ask: Decimal) -> Self {
        self.set_quote(bid, ask);
        self
    }

    pub fn with_balance(self, asset: impl Into<AssetName>, amount: Decimal) -> Self {
        self.set_balance(asset, amount);
        self
    }

    pub fn set_quote(&self, bid: Decimal, ask: Decimal) {
        let mut state = self.state.lock();
        state.bid = Some(bid);
        state.ask = Some(ask);
    }

    pub fn set_bid(&self, bid: Option<Decimal>) {
        self.state.lock().bid = bid;
    }

    pub fn set_ask(&self, ask: Option<Decimal>) {
        self.state.lock().ask = ask;
    }

    pub fn clear_quote(&self) {
        let mut state = self.state.lock();
        state.bid = None;
        state.ask = None;
    }

    pub fn set_balance(&self, asset: impl Into<AssetName>, amount: Decimal) {
        self.state.lock().balances.insert(asset.into(), amount);
    }

    /// Make every subsequent request fail with a connectivity error.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.state.lock().failure = Some(message.into());
    }

    pub fn recover(&self) {
        self.state.lock().failure = None;
    }

    fn check_failure(&self, state: &MockConnectorState) -> Result<(), ConnectorError> {
        match &state.failure {
            Some(message) => Err(ConnectorError::connectivity(
                self.exchange.clone(),
                message.clone(),
            )),
            None => Ok(()),
        }
    }
}

impl ExchangeConnector for MockConnector {
    fn exchange(&self) -> &ExchangeId {
        &self.exchange
    }

    fn fetch_price(
        &self,
        _instrument: &InstrumentPair,
        side: Side,
    ) -> Result<Option<Decimal>, ConnectorError> {
        let state = self.state.lock();
        self.check_failure(&state)?;

        Ok(match side {
            Side::Buy => state.ask,
            Side::Sell => state.bid,
        })
    }

    fn fetch_available_balance(&self, asset: &AssetName) -> Result<Decimal, ConnectorError> {
        let state = self.state.lock();
        self.check_failure(&state)?;

        state
            .balances
            .get(asset)
            .copied()
            .ok_or_else(|| ConnectorError::UnknownAsset {
                exchange: self.exchange.clone(),
                asset: asset.clone(),
            })
    }
}

#[derive(Debug, Default)]
struct MockAttemptState {
    close_type: Option<CloseType>,
    realized_profit: Option<Decimal>,
}

/// Handle whose terminal state is set by the test through [`MockExecutionEngine`].
#[derive(Debug, Clone, Default)]
pub struct MockAttemptHandle {
    state: Arc<Mutex<MockAttemptState>>,
}

impl MockAttemptHandle {
    pub fn close(&self, close_type: CloseType) {
        self.state.lock().close_type = Some(close_type);
    }

    pub fn close_with_profit(&self, profit: Decimal) {
        let mut state = self.state.lock();
        state.close_type = Some(CloseType::Completed);
        state.realized_profit = Some(profit);
    }
}

impl ExecutionHandle for MockAttemptHandle {
    fn is_closed(&self) -> bool {
        self.state.lock().close_type.is_some()
    }

    fn close_type(&self) -> Option<CloseType> {
        self.state.lock().close_type
    }

    fn status(&self) -> String {
        match self.close_type() {
            Some(close_type) => format!("closed ({close_type})"),
            None => "running".to_string(),
        }
    }

    fn realized_profit(&self) -> Option<Decimal> {
        self.state.lock().realized_profit
    }
}

#[derive(Debug, Default)]
struct MockEngineState {
    started: Vec<(ArbitrageRequest, MockAttemptHandle)>,
    reject_next: Option<String>,
}

/// [`ExecutionEngine`] that records every started attempt and never closes
/// one on its own.
///
/// Clones share state, so a test can keep a clone after moving the engine
/// into the strategy.
#[derive(Debug, Clone, Default)]
pub struct MockExecutionEngine {
    state: Arc<Mutex<MockEngineState>>,
}

impl MockExecutionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started_count(&self) -> usize {
        self.state.lock().started.len()
    }

    pub fn requests(&self) -> Vec<ArbitrageRequest> {
        self.state
            .lock()
            .started
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    /// Handle of the `index`th started attempt, in start order.
    pub fn handle(&self, index: usize) -> Option<MockAttemptHandle> {
        self.state
            .lock()
            .started
            .get(index)
            .map(|(_, handle)| handle.clone())
    }

    pub fn close(&self, index: usize, close_type: CloseType) {
        if let Some(handle) = self.handle(index) {
            handle.close(close_type);
        }
    }

    pub fn close_all(&self, close_type: CloseType) {
        for (_, handle) in &self.state.lock().started {
            handle.close(close_type);
        }
    }

    /// Reject the next call to [`ExecutionEngine::start`].
    pub fn reject_next(&self, reason: impl Into<String>) {
        self.state.lock().reject_next = Some(reason.into());
    }
}

impl ExecutionEngine for MockExecutionEngine {
    type Handle = MockAttemptHandle;

    fn start(&mut self, request: ArbitrageRequest) -> Result<Self::Handle, ExecutionError> {
        let mut state = self.state.lock();
        if let Some(reason) = state.reject_next.take() {
            return Err(ExecutionError::Rejected(reason));
        }

        let handle = MockAttemptHandle::default();
        state.started.push((request, handle.clone()));
        Ok(handle)
    }
}
