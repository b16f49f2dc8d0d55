pub mod enums;
pub mod error;
pub mod record;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Direction;
pub use error::CoreError;
pub use record::TradeRecord;
pub use structs::{Trade, TradeId, TradeStatus};
