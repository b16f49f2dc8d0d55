use crate::enums::Direction;
use crate::error::CoreError;
use crate::structs::{Trade, TradeId, TradeStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The flat shape of a trade as it crosses a serialization boundary.
///
/// Exit fields are nullable here; converting into a [`Trade`] turns them into
/// the `Open`/`Closed` variant. Only the shape is checked during conversion,
/// value invariants are checked by [`Trade::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: TradeId,
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub quantity: Decimal,
    pub entry_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fees: Decimal,
}

impl TryFrom<TradeRecord> for Trade {
    type Error = CoreError;

    fn try_from(record: TradeRecord) -> Result<Self, Self::Error> {
        let status = match (record.exit_price, record.exit_time) {
            (None, None) => TradeStatus::Open,
            (Some(exit_price), Some(exit_time)) => TradeStatus::Closed {
                exit_price,
                exit_time,
            },
            (Some(_), None) => {
                return Err(CoreError::invalid(record.id, "exit price set without exit time"));
            }
            (None, Some(_)) => {
                return Err(CoreError::invalid(record.id, "exit time set without exit price"));
            }
        };

        Ok(Trade {
            id: record.id,
            symbol: record.symbol,
            direction: record.direction,
            entry_price: record.entry_price,
            quantity: record.quantity,
            entry_time: record.entry_time,
            fees: record.fees,
            status,
        })
    }
}

impl From<Trade> for TradeRecord {
    fn from(trade: Trade) -> Self {
        let (exit_price, exit_time) = match trade.status {
            TradeStatus::Open => (None, None),
            TradeStatus::Closed {
                exit_price,
                exit_time,
            } => (Some(exit_price), Some(exit_time)),
        };
        TradeRecord {
            id: trade.id,
            symbol: trade.symbol,
            direction: trade.direction,
            entry_price: trade.entry_price,
            quantity: trade.quantity,
            entry_time: trade.entry_time,
            exit_price,
            exit_time,
            fees: trade.fees,
        }
    }
}
