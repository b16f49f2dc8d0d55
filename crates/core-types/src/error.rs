use crate::structs::TradeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid trade data for {id}: {reason}")]
    InvalidTradeData { id: TradeId, reason: String },

    #[error("Trade {0} is already closed")]
    AlreadyClosed(TradeId),
}

impl CoreError {
    pub(crate) fn invalid(id: TradeId, reason: impl Into<String>) -> Self {
        CoreError::InvalidTradeData {
            id,
            reason: reason.into(),
        }
    }
}
