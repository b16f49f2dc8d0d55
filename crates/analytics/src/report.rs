use chrono::{DateTime, Utc};
use core_types::TradeId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The outcome of a ratio whose denominator may be zero.
///
/// Kept as an explicit variant instead of a float infinity so reports compare
/// and serialize the same way everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Ratio {
    Finite(Decimal),
    /// Positive numerator over a zero denominator, or a positive quotient
    /// too large to represent.
    Unbounded,
    /// Nothing to compare.
    Undefined,
}

impl Default for Ratio {
    fn default() -> Self {
        Ratio::Undefined
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Finite(value) => write!(f, "{}", value.round_dp(4)),
            Ratio::Unbounded => write!(f, "unbounded"),
            Ratio::Undefined => write!(f, "n/a"),
        }
    }
}

/// A point in the cumulative net-profit curve, one per closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub trade_id: TradeId,
    pub equity: Decimal,
}

/// A comprehensive report of trading performance over a slice of the ledger.
///
/// This struct is the final output of the `AnalyticsEngine`. It is built
/// fresh for every call and carries no identity beyond the inputs that
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    // I. Trade Counts
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub breakeven_trades: usize,
    /// Fraction of decisive trades that were winners, in [0, 1].
    pub win_rate: Decimal,

    // II. Profitability
    pub total_net_profit: Decimal,
    pub gross_profit: Decimal,
    /// Magnitude of the summed losses.
    pub gross_loss: Decimal,
    pub total_fees: Decimal,
    pub average_win: Decimal,
    /// Magnitude of the average losing trade.
    pub average_loss: Decimal,
    pub largest_win: Decimal,
    /// Magnitude of the worst losing trade.
    pub largest_loss: Decimal,
    pub expectancy: Decimal,
    pub profit_factor: Ratio,
    pub payoff_ratio: Ratio,

    // III. Risk
    pub max_drawdown: Decimal,
    pub recovery_factor: Ratio,
    pub trade_sharpe: Option<Decimal>,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,

    // IV. Time-Based Metrics
    #[serde(with = "humantime_serde")]
    pub average_holding_period: Duration,

    pub equity_curve: Vec<EquityPoint>,
}

impl MetricsReport {
    /// Creates a new, zeroed-out report.
    /// This is also the report of an empty selection.
    pub fn new() -> Self {
        Self {
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            breakeven_trades: 0,
            win_rate: Decimal::ZERO,
            total_net_profit: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            total_fees: Decimal::ZERO,
            average_win: Decimal::ZERO,
            average_loss: Decimal::ZERO,
            largest_win: Decimal::ZERO,
            largest_loss: Decimal::ZERO,
            expectancy: Decimal::ZERO,
            profit_factor: Ratio::Finite(Decimal::ZERO),
            payoff_ratio: Ratio::Undefined,
            max_drawdown: Decimal::ZERO,
            recovery_factor: Ratio::Undefined,
            trade_sharpe: None,
            max_consecutive_wins: 0,
            max_consecutive_losses: 0,
            average_holding_period: Duration::ZERO,
            equity_curve: Vec::new(),
        }
    }
}

impl Default for MetricsReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ratio_serializes_as_tagged_variant() {
        let finite = serde_json::to_value(Ratio::Finite(dec!(1.5))).unwrap();
        assert_eq!(finite["kind"], "finite");
        assert_eq!(finite["value"], "1.5");

        let unbounded = serde_json::to_value(Ratio::Unbounded).unwrap();
        assert_eq!(unbounded, serde_json::json!({ "kind": "unbounded" }));
    }

    #[test]
    fn ratio_display() {
        assert_eq!(Ratio::Finite(dec!(2.123456)).to_string(), "2.1235");
        assert_eq!(Ratio::Unbounded.to_string(), "unbounded");
        assert_eq!(Ratio::Undefined.to_string(), "n/a");
    }

    #[test]
    fn empty_report_round_trips_through_json() {
        let report = MetricsReport::new();
        let json = serde_json::to_string(&report).unwrap();
        let back: MetricsReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
