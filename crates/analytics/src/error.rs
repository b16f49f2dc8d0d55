use core_types::{CoreError, TradeId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Invalid trade data for {id}: {reason}")]
    InvalidTradeData { id: TradeId, reason: String },

    #[error("Invalid report filter: {0}")]
    InvalidFilter(String),
}

impl From<CoreError> for AnalyticsError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidTradeData { id, reason } => {
                AnalyticsError::InvalidTradeData { id, reason }
            }
            CoreError::AlreadyClosed(id) => AnalyticsError::InvalidTradeData {
                id,
                reason: "trade is already closed".to_string(),
            },
        }
    }
}
