//! # Trade Ledger
//!
//! The system of record the analytics engine reads from: an ordered,
//! append-only collection of open and closed trades, keyed by a unique id.
//!
//! The ledger is an ordinary owned value. Whoever persists the trades builds
//! a `Ledger` and passes it (or a slice of it) to the analytics engine; there
//! is no global instance.

pub mod error;

pub use error::LedgerError;

use core_types::{Trade, TradeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Ordered collection of trades with unique ids.
///
/// Insertion order is preserved but is not assumed to be chronological.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Trade>", try_from = "Vec<Trade>")]
pub struct Ledger {
    trades: Vec<Trade>,
    index: HashMap<TradeId, usize>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from trades in the given order.
    ///
    /// Fails on the first id that has already been seen.
    pub fn from_trades(trades: impl IntoIterator<Item = Trade>) -> Result<Self, LedgerError> {
        let mut ledger = Self::new();
        for trade in trades {
            ledger.append(trade)?;
        }
        tracing::debug!(
            trades = ledger.len(),
            open = ledger.open_trades().count(),
            "Ledger constructed."
        );
        Ok(ledger)
    }

    /// Appends a trade. The ledger is left unchanged if the id is taken.
    pub fn append(&mut self, trade: Trade) -> Result<(), LedgerError> {
        if self.index.contains_key(&trade.id) {
            tracing::warn!(trade_id = %trade.id, "Rejected trade with duplicate id.");
            return Err(LedgerError::DuplicateTradeId(trade.id));
        }
        self.index.insert(trade.id, self.trades.len());
        self.trades.push(trade);
        Ok(())
    }

    /// All trades, in insertion order.
    pub fn all_trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Closed trades only, in insertion order.
    pub fn closed_trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| t.is_closed())
    }

    /// Open trades only, in insertion order.
    pub fn open_trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| t.is_open())
    }

    pub fn get(&self, id: &TradeId) -> Option<&Trade> {
        self.index.get(id).map(|&i| &self.trades[i])
    }

    pub fn contains(&self, id: &TradeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Distinct instrument symbols, sorted.
    pub fn symbols(&self) -> Vec<&str> {
        self.trades
            .iter()
            .map(|t| t.symbol.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl From<Ledger> for Vec<Trade> {
    fn from(ledger: Ledger) -> Self {
        ledger.trades
    }
}

impl TryFrom<Vec<Trade>> for Ledger {
    type Error = LedgerError;

    fn try_from(trades: Vec<Trade>) -> Result<Self, Self::Error> {
        Ledger::from_trades(trades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::Direction;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn trade(n: u128, symbol: &str) -> Trade {
        Trade::open(
            TradeId::from_uuid(Uuid::from_u128(n)),
            symbol,
            Direction::Long,
            dec!(10),
            dec!(1),
            Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn failed_append_leaves_ledger_unchanged() {
        let mut ledger = Ledger::from_trades([trade(1, "ES"), trade(2, "NQ")]).unwrap();
        let before = ledger.clone();
        assert!(ledger.append(trade(2, "CL")).is_err());
        assert_eq!(ledger, before);
        assert_eq!(ledger.get(&TradeId::from_uuid(Uuid::from_u128(2))).unwrap().symbol, "NQ");
    }

    #[test]
    fn symbols_are_sorted_and_distinct() {
        let ledger =
            Ledger::from_trades([trade(1, "NQ"), trade(2, "ES"), trade(3, "NQ")]).unwrap();
        assert_eq!(ledger.symbols(), vec!["ES", "NQ"]);
    }

    #[test]
    fn empty_ledger() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.closed_trades().count(), 0);
        assert!(ledger.symbols().is_empty());
    }
}
