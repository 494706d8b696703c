//! Active-attempt bookkeeping owned by the strategy.

use chrono::{DateTime, Utc};
use derive_more::Display;
use indexmap::IndexMap;
use kaspa_arb_execution::{CloseType, ExecutionHandle};
use kaspa_arb_instrument::ExchangeId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};

/// Unique identifier of an arbitrage attempt.
///
/// Formatted `{buy}_{sell}_{unix_seconds}_{sequence}`, where the sequence is a
/// per-strategy monotonic counter.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AttemptId(SmolStr);

impl AttemptId {
    pub fn new(
        buy_exchange: &ExchangeId,
        sell_exchange: &ExchangeId,
        dispatched_at: DateTime<Utc>,
        sequence: u64,
    ) -> Self {
        Self(format_smolstr!(
            "{buy_exchange}_{sell_exchange}_{}_{sequence}",
            dispatched_at.timestamp()
        ))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Lifecycle of an attempt: `Active` until the engine reports a close.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display, Deserialize, Serialize)]
pub enum AttemptStatus {
    #[display("ACTIVE")]
    Active,
    #[display("COMPLETED")]
    Completed,
    #[display("FAILED")]
    Failed,
}

impl From<CloseType> for AttemptStatus {
    fn from(value: CloseType) -> Self {
        match value {
            CloseType::Completed => AttemptStatus::Completed,
            _ => AttemptStatus::Failed,
        }
    }
}

/// One dispatched arbitrage attempt and the engine handle driving it.
#[derive(Debug, Clone)]
pub struct ArbitrageAttempt<Handle> {
    pub id: AttemptId,
    pub buy_exchange: ExchangeId,
    pub sell_exchange: ExchangeId,
    pub amount: Decimal,
    pub start_time: DateTime<Utc>,
    pub status: AttemptStatus,
    /// Net profitability at dispatch time, in percent
    pub expected_profit_pct: Decimal,
    pub handle: Handle,
}

/// Attempt reclaimed from the active set after the engine closed it.
#[derive(Debug, Clone)]
pub struct ClosedAttempt<Handle> {
    pub attempt: ArbitrageAttempt<Handle>,
    /// `None` if the engine closed the attempt without reporting a type
    pub close_type: Option<CloseType>,
    pub realized_profit: Option<Decimal>,
}

/// Attempts currently in flight, keyed by id, in dispatch order.
#[derive(Debug, Clone)]
pub struct ActiveAttempts<Handle> {
    attempts: IndexMap<AttemptId, ArbitrageAttempt<Handle>>,
}

impl<Handle> Default for ActiveAttempts<Handle> {
    fn default() -> Self {
        Self {
            attempts: IndexMap::new(),
        }
    }
}

impl<Handle> ActiveAttempts<Handle>
where
    Handle: ExecutionHandle,
{
    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn contains(&self, id: &AttemptId) -> bool {
        self.attempts.contains_key(id)
    }

    pub fn get(&self, id: &AttemptId) -> Option<&ArbitrageAttempt<Handle>> {
        self.attempts.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArbitrageAttempt<Handle>> {
        self.attempts.values()
    }

    /// Insert a newly dispatched attempt, returning any attempt previously
    /// stored under the same id.
    pub fn insert(&mut self, attempt: ArbitrageAttempt<Handle>) -> Option<ArbitrageAttempt<Handle>> {
        self.attempts.insert(attempt.id.clone(), attempt)
    }

    /// Remove every attempt whose handle reports a terminal close, preserving
    /// the dispatch order of those that remain.
    ///
    /// An attempt closed without a close type is still removed, with status
    /// [`AttemptStatus::Failed`].
    pub fn reclaim(&mut self) -> Vec<ClosedAttempt<Handle>> {
        let closed_ids = self
            .attempts
            .values()
            .filter(|attempt| attempt.handle.is_closed())
            .map(|attempt| attempt.id.clone())
            .collect::<Vec<_>>();

        closed_ids
            .into_iter()
            .filter_map(|id| self.attempts.shift_remove(&id))
            .map(|mut attempt| {
                let close_type = attempt.handle.close_type();
                attempt.status = close_type.map_or(AttemptStatus::Failed, AttemptStatus::from);
                let realized_profit = attempt.handle.realized_profit();
                ClosedAttempt {
                    attempt,
                    close_type,
                    realized_profit,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use kaspa_arb_execution::mock::MockAttemptHandle;
    use rust_decimal_macros::dec;

    /// Handle of an engine that closes attempts without reporting how.
    #[derive(Debug)]
    struct UntypedClose;

    impl ExecutionHandle for UntypedClose {
        fn is_closed(&self) -> bool {
            true
        }

        fn close_type(&self) -> Option<CloseType> {
            None
        }

        fn status(&self) -> String {
            "closed".to_string()
        }
    }

    fn attempt(sequence: u64) -> ArbitrageAttempt<MockAttemptHandle> {
        attempt_with(sequence, MockAttemptHandle::default())
    }

    fn attempt_with<Handle>(sequence: u64, handle: Handle) -> ArbitrageAttempt<Handle> {
        let buy = ExchangeId::from("kucoin");
        let sell = ExchangeId::from("kraken");
        let start_time = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        ArbitrageAttempt {
            id: AttemptId::new(&buy, &sell, start_time, sequence),
            buy_exchange: buy,
            sell_exchange: sell,
            amount: dec!(100),
            start_time,
            status: AttemptStatus::Active,
            expected_profit_pct: dec!(1.20),
            handle,
        }
    }

    #[test]
    fn test_attempt_id_format() {
        let attempt = attempt(7);
        assert_eq!(attempt.id.as_str(), "kucoin_kraken_1735689600_7");
    }

    #[test]
    fn test_same_second_ids_do_not_collide() {
        let mut active = ActiveAttempts::default();
        assert!(active.insert(attempt(0)).is_none());
        assert!(active.insert(attempt(1)).is_none());
        assert_eq!(active.len(), 2);
    }

    #[test]
    fn test_reclaim_removes_only_closed_attempts() {
        let mut active = ActiveAttempts::default();
        let (first, second, third) = (attempt(0), attempt(1), attempt(2));
        let (first_handle, third_handle) = (first.handle.clone(), third.handle.clone());
        let second_id = second.id.clone();
        active.insert(first);
        active.insert(second);
        active.insert(third);

        first_handle.close_with_profit(dec!(1.5));
        third_handle.close(CloseType::Expired);

        let closed = active.reclaim();
        assert_eq!(closed.len(), 2);
        assert_eq!(closed[0].attempt.status, AttemptStatus::Completed);
        assert_eq!(closed[0].realized_profit, Some(dec!(1.5)));
        assert_eq!(closed[1].close_type, Some(CloseType::Expired));
        assert_eq!(closed[1].attempt.status, AttemptStatus::Failed);

        assert_eq!(active.len(), 1);
        assert!(active.contains(&second_id));
        assert_eq!(active.get(&second_id).map(|a| a.status), Some(AttemptStatus::Active));
    }

    #[test]
    fn test_reclaim_with_nothing_closed_is_noop() {
        let mut active = ActiveAttempts::default();
        active.insert(attempt(0));
        assert!(active.reclaim().is_empty());
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn test_reclaim_attempt_closed_without_close_type() {
        let mut active = ActiveAttempts::default();
        active.insert(attempt_with(0, UntypedClose));

        let closed = active.reclaim();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].close_type, None);
        assert_eq!(closed[0].attempt.status, AttemptStatus::Failed);
        assert!(active.is_empty());
    }
}
