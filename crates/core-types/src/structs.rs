use crate::enums::Direction;
use crate::error::CoreError;
use crate::record::TradeRecord;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The unique, immutable identifier of a trade.
///
/// Ordering is by the underlying UUID, which gives the analytics engine a
/// stable tie-breaker when two trades close at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(pub Uuid);

impl TradeId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TradeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Whether a trade has been round-tripped.
///
/// The exit fields only exist on the `Closed` variant, so an open trade can
/// never be mistaken for one with a realized result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStatus {
    Open,
    Closed {
        exit_price: Decimal,
        exit_time: DateTime<Utc>,
    },
}

/// One executed position in a single instrument, open or closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TradeRecord", into = "TradeRecord")]
pub struct Trade {
    pub id: TradeId,
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub quantity: Decimal,
    pub entry_time: DateTime<Utc>,
    pub fees: Decimal,
    pub status: TradeStatus,
}

impl Trade {
    /// Creates a new open trade with zero fees.
    pub fn open(
        id: TradeId,
        symbol: impl Into<String>,
        direction: Direction,
        entry_price: Decimal,
        quantity: Decimal,
        entry_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            direction,
            entry_price,
            quantity,
            entry_time,
            fees: Decimal::ZERO,
            status: TradeStatus::Open,
        }
    }

    pub fn with_fees(mut self, fees: Decimal) -> Self {
        self.fees = fees;
        self
    }

    /// Closes an open trade at the given price and time.
    ///
    /// The resulting trade is validated, so a close that would break an
    /// invariant (e.g. exiting before the entry) is rejected.
    pub fn close(self, exit_price: Decimal, exit_time: DateTime<Utc>) -> Result<Trade, CoreError> {
        if self.is_closed() {
            return Err(CoreError::AlreadyClosed(self.id));
        }
        let closed = Trade {
            status: TradeStatus::Closed {
                exit_price,
                exit_time,
            },
            ..self
        };
        closed.validate()?;
        Ok(closed)
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, TradeStatus::Open)
    }

    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    pub fn exit_price(&self) -> Option<Decimal> {
        match self.status {
            TradeStatus::Closed { exit_price, .. } => Some(exit_price),
            TradeStatus::Open => None,
        }
    }

    pub fn exit_time(&self) -> Option<DateTime<Utc>> {
        match self.status {
            TradeStatus::Closed { exit_time, .. } => Some(exit_time),
            TradeStatus::Open => None,
        }
    }

    /// Realized profit after fees. `None` while the trade is open, or when
    /// the result does not fit in a `Decimal` (which `validate` rejects).
    ///
    /// long:  (exit - entry) * quantity - fees
    /// short: (entry - exit) * quantity - fees
    pub fn net_profit(&self) -> Option<Decimal> {
        let exit_price = self.exit_price()?;
        let price_move = match self.direction {
            Direction::Long => exit_price.checked_sub(self.entry_price)?,
            Direction::Short => self.entry_price.checked_sub(exit_price)?,
        };
        price_move.checked_mul(self.quantity)?.checked_sub(self.fees)
    }

    /// Time between entry and exit. `None` while the trade is open.
    pub fn holding_period(&self) -> Option<Duration> {
        self.exit_time().map(|exit_time| exit_time - self.entry_time)
    }

    /// Checks the structural invariants of the trade.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.symbol.trim().is_empty() {
            return Err(CoreError::invalid(self.id, "symbol is empty"));
        }
        if self.entry_price <= Decimal::ZERO {
            return Err(CoreError::invalid(
                self.id,
                format!("entry price must be positive, got {}", self.entry_price),
            ));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(CoreError::invalid(
                self.id,
                format!("quantity must be positive, got {}", self.quantity),
            ));
        }
        if self.fees < Decimal::ZERO {
            return Err(CoreError::invalid(
                self.id,
                format!("fees must not be negative, got {}", self.fees),
            ));
        }
        if let TradeStatus::Closed {
            exit_price,
            exit_time,
        } = self.status
        {
            if exit_price <= Decimal::ZERO {
                return Err(CoreError::invalid(
                    self.id,
                    format!("exit price must be positive, got {exit_price}"),
                ));
            }
            if exit_time < self.entry_time {
                return Err(CoreError::invalid(
                    self.id,
                    format!(
                        "exit time {exit_time} is before entry time {}",
                        self.entry_time
                    ),
                ));
            }
            if self.net_profit().is_none() {
                return Err(CoreError::invalid(
                    self.id,
                    format!(
                        "net profit of {} x {} from {} to {exit_price} is out of range",
                        self.direction, self.quantity, self.entry_price
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn long_trade() -> Trade {
        Trade::open(
            TradeId::from_uuid(Uuid::from_u128(1)),
            "AAPL",
            Direction::Long,
            dec!(100),
            dec!(10),
            at(9),
        )
        .with_fees(dec!(5))
    }

    #[test]
    fn open_trade_has_no_realized_result() {
        let trade = long_trade();
        assert!(trade.is_open());
        assert_eq!(trade.net_profit(), None);
        assert_eq!(trade.holding_period(), None);
        assert!(trade.validate().is_ok());
    }

    #[test]
    fn long_net_profit_subtracts_fees() {
        let trade = long_trade().close(dec!(110), at(15)).unwrap();
        assert_eq!(trade.net_profit(), Some(dec!(95)));
        assert_eq!(trade.holding_period(), Some(Duration::hours(6)));
    }

    #[test]
    fn short_net_profit_is_inverted() {
        let mut trade = long_trade();
        trade.direction = Direction::Short;
        let trade = trade.close(dec!(110), at(15)).unwrap();
        assert_eq!(trade.net_profit(), Some(dec!(-105)));
    }

    #[test]
    fn closing_twice_fails() {
        let trade = long_trade().close(dec!(110), at(15)).unwrap();
        let id = trade.id;
        assert_eq!(
            trade.close(dec!(120), at(16)),
            Err(CoreError::AlreadyClosed(id))
        );
    }

    #[test]
    fn exit_before_entry_is_rejected() {
        let err = long_trade().close(dec!(110), at(8)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTradeData { .. }));
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let mut trade = long_trade();
        trade.quantity = dec!(-1);
        assert!(trade.validate().is_err());
        trade.quantity = Decimal::ZERO;
        assert!(trade.validate().is_err());
    }

    #[test]
    fn negative_fees_are_rejected() {
        let trade = long_trade().with_fees(dec!(-0.01));
        assert!(trade.validate().is_err());
    }

    #[test]
    fn unrepresentable_net_profit_is_rejected() {
        let mut trade = long_trade().with_fees(Decimal::ZERO);
        trade.entry_price = dec!(1);
        trade.quantity = dec!(10000000000);
        let err = trade
            .clone()
            .close(dec!(100000000000000000000), at(15))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTradeData { .. }));

        trade.status = TradeStatus::Closed {
            exit_price: dec!(100000000000000000000),
            exit_time: at(15),
        };
        assert_eq!(trade.net_profit(), None);
        assert!(trade.validate().is_err());
    }

    #[test]
    fn zero_length_hold_is_valid() {
        let trade = long_trade().close(dec!(100), at(9)).unwrap();
        assert_eq!(trade.holding_period(), Some(Duration::zero()));
    }
}
