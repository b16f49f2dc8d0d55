use core_types::TradeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Trade id {0} appears more than once in the ledger")]
    DuplicateTradeId(TradeId),
}
