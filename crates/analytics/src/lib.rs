//! # TradeMaster Analytics Engine
//!
//! This crate turns a trader's recorded trades into performance and risk
//! statistics: win rate, expectancy, profit factor, drawdown, streaks and the
//! equity curve.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of how
//!   trades are persisted or displayed. It depends only on `core-types` and the
//!   `ledger` (Layer 0/1).
//! - **Stateless Calculation:** The `AnalyticsEngine` takes an immutable slice of
//!   trades and a `ReportFilter` and produces a fresh `MetricsReport`. The same
//!   trades in any order with the same filter always give an identical report.
//!
//! ## Public API
//!
//! - `AnalyticsEngine` / `compute_report`: the calculation entry points.
//! - `ReportFilter`, `DateRange`: restrict which closed trades are analysed.
//! - `MetricsReport`, `EquityPoint`, `Ratio`: the output model.
//! - `AnalyticsError`: the errors that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod filter;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{compute_report, AnalyticsEngine};
pub use error::AnalyticsError;
pub use filter::{DateRange, ReportFilter};
pub use report::{EquityPoint, MetricsReport, Ratio};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn public_types_are_send_sync() {
        assert_send::<AnalyticsEngine>();
        assert_sync::<AnalyticsEngine>();
        assert_send::<ReportFilter>();
        assert_sync::<ReportFilter>();
        assert_send::<MetricsReport>();
        assert_sync::<MetricsReport>();
        assert_send::<AnalyticsError>();
        assert_sync::<AnalyticsError>();
        assert_send::<ledger::Ledger>();
        assert_sync::<ledger::Ledger>();
    }
}
