use crate::error::AnalyticsError;
use crate::filter::ReportFilter;
use crate::report::{EquityPoint, MetricsReport, Ratio};
use chrono::{DateTime, Utc};
use core_types::Trade;
use ledger::Ledger;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use std::time::Duration;

/// A closed trade with its realized figures resolved once up front.
struct Realized<'a> {
    trade: &'a Trade,
    exit_time: DateTime<Utc>,
    net_profit: Decimal,
    holding_ms: i64,
}

impl<'a> Realized<'a> {
    fn from_trade(trade: &'a Trade) -> Option<Self> {
        let exit_time = trade.exit_time()?;
        let net_profit = trade.net_profit()?;
        let holding_ms = trade.holding_period()?.num_milliseconds();
        Some(Self {
            trade,
            exit_time,
            net_profit,
            holding_ms,
        })
    }
}

/// A stateless calculator for deriving performance metrics from a trader's ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// # Arguments
    ///
    /// * `trades` - Any mix of open and closed trades, in any order.
    /// * `filter` - Restricts which closed trades the report covers.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `MetricsReport`, or `InvalidTradeData` if any
    /// closed trade in `trades` breaks its invariants. Open trades are
    /// ignored.
    #[tracing::instrument(name = "compute_report", skip_all, fields(input = trades.len()))]
    pub fn compute_report(
        &self,
        trades: &[Trade],
        filter: &ReportFilter,
    ) -> Result<MetricsReport, AnalyticsError> {
        // Every closed record is checked, including ones the filter would drop.
        for trade in trades.iter().filter(|t| t.is_closed()) {
            trade.validate()?;
        }

        let mut realized: Vec<Realized<'_>> = trades
            .iter()
            .filter(|t| filter.matches(t))
            .filter_map(Realized::from_trade)
            .collect();
        realized.sort_by(|a, b| {
            a.exit_time
                .cmp(&b.exit_time)
                .then_with(|| a.trade.id.cmp(&b.trade.id))
        });

        check_ranges(&realized)?;

        tracing::debug!(
            qualifying = realized.len(),
            symbol = ?filter.symbol,
            direction = ?filter.direction,
            "Computing report over closed trades."
        );

        let mut report = MetricsReport::new();
        if realized.is_empty() {
            return Ok(report);
        }

        self.calculate_profitability(&realized, &mut report);
        self.calculate_equity_curve(&realized, &mut report);
        self.calculate_drawdown(&mut report);
        self.calculate_streaks(&realized, &mut report);
        self.calculate_time_metrics(&realized, &mut report);
        self.calculate_ratios(&realized, &mut report);

        Ok(report)
    }

    /// Computes a report over every trade in a ledger.
    pub fn compute_ledger_report(
        &self,
        ledger: &Ledger,
        filter: &ReportFilter,
    ) -> Result<MetricsReport, AnalyticsError> {
        self.compute_report(ledger.all_trades(), filter)
    }

    /// Calculates counts, sums and the per-trade averages.
    fn calculate_profitability(&self, realized: &[Realized<'_>], report: &mut MetricsReport) {
        report.total_trades = realized.len();

        for r in realized {
            let pnl = r.net_profit;
            report.total_net_profit += pnl;
            report.total_fees += r.trade.fees;

            if pnl > Decimal::ZERO {
                report.winning_trades += 1;
                report.gross_profit += pnl;
                report.largest_win = report.largest_win.max(pnl);
            } else if pnl < Decimal::ZERO {
                report.losing_trades += 1;
                report.gross_loss += pnl.abs();
                report.largest_loss = report.largest_loss.max(pnl.abs());
            } else {
                report.breakeven_trades += 1;
            }
        }

        let decisive = report.winning_trades + report.losing_trades;
        if decisive > 0 {
            report.win_rate = Decimal::from(report.winning_trades) / Decimal::from(decisive);
        }

        if report.winning_trades > 0 {
            report.average_win = report.gross_profit / Decimal::from(report.winning_trades);
        }

        if report.losing_trades > 0 {
            report.average_loss = report.gross_loss / Decimal::from(report.losing_trades);
        }

        report.expectancy = report.total_net_profit / Decimal::from(report.total_trades);
    }

    /// Builds the running sum of net profit in exit order.
    fn calculate_equity_curve(&self, realized: &[Realized<'_>], report: &mut MetricsReport) {
        let mut equity = Decimal::ZERO;
        report.equity_curve = realized
            .iter()
            .map(|r| {
                equity += r.net_profit;
                EquityPoint {
                    timestamp: r.exit_time,
                    trade_id: r.trade.id,
                    equity,
                }
            })
            .collect();
    }

    /// Calculates maximum drawdown from the equity curve.
    ///
    /// The running peak starts at the first point of the curve, so a curve
    /// that never decreases has zero drawdown.
    fn calculate_drawdown(&self, report: &mut MetricsReport) {
        let Some(first) = report.equity_curve.first() else {
            return;
        };

        let mut peak_equity = first.equity;
        let mut max_drawdown = Decimal::ZERO;

        for point in &report.equity_curve {
            if point.equity > peak_equity {
                peak_equity = point.equity;
            }
            let drawdown = peak_equity - point.equity;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }

        report.max_drawdown = max_drawdown;
    }

    /// Longest runs of consecutive wins and losses in exit order.
    /// A breakeven trade ends whichever streak is running.
    fn calculate_streaks(&self, realized: &[Realized<'_>], report: &mut MetricsReport) {
        let mut current_wins = 0;
        let mut current_losses = 0;

        for r in realized {
            match r.net_profit.cmp(&Decimal::ZERO) {
                std::cmp::Ordering::Greater => {
                    current_wins += 1;
                    current_losses = 0;
                }
                std::cmp::Ordering::Less => {
                    current_losses += 1;
                    current_wins = 0;
                }
                std::cmp::Ordering::Equal => {
                    current_wins = 0;
                    current_losses = 0;
                }
            }
            report.max_consecutive_wins = report.max_consecutive_wins.max(current_wins);
            report.max_consecutive_losses = report.max_consecutive_losses.max(current_losses);
        }
    }

    /// Calculates time-based metrics.
    fn calculate_time_metrics(&self, realized: &[Realized<'_>], report: &mut MetricsReport) {
        let total_ms: i128 = realized.iter().map(|r| i128::from(r.holding_ms)).sum();
        let avg_ms = total_ms / realized.len() as i128;
        report.average_holding_period = Duration::from_millis(u64::try_from(avg_ms).unwrap_or(0));
    }

    /// Calculates the ratio metrics whose denominators may be zero.
    fn calculate_ratios(&self, realized: &[Realized<'_>], report: &mut MetricsReport) {
        // --- Profit Factor ---
        report.profit_factor = if report.gross_loss > Decimal::ZERO {
            divide(report.gross_profit, report.gross_loss)
        } else if report.winning_trades > 0 {
            Ratio::Unbounded
        } else {
            Ratio::Finite(Decimal::ZERO)
        };

        // --- Payoff Ratio ---
        report.payoff_ratio = if report.average_loss > Decimal::ZERO {
            divide(report.average_win, report.average_loss)
        } else if report.winning_trades > 0 {
            Ratio::Unbounded
        } else {
            Ratio::Undefined
        };

        // --- Recovery Factor ---
        report.recovery_factor = if report.max_drawdown > Decimal::ZERO {
            divide(report.total_net_profit, report.max_drawdown)
        } else if report.total_net_profit > Decimal::ZERO {
            Ratio::Unbounded
        } else {
            Ratio::Undefined
        };

        report.trade_sharpe = trade_sharpe(realized, report.total_net_profit);
    }
}

/// Rejects a selection whose running sums would leave the `Decimal` range.
///
/// Every partial equity value lies within `[-gross_loss, gross_profit]` and
/// every peak-to-trough distance within `gross_profit + gross_loss`, so once
/// these fit the report passes can use plain arithmetic.
fn check_ranges(realized: &[Realized<'_>]) -> Result<(), AnalyticsError> {
    let mut gross_profit = Decimal::ZERO;
    let mut gross_loss = Decimal::ZERO;
    let mut total_fees = Decimal::ZERO;

    for r in realized {
        let out_of_range = || AnalyticsError::InvalidTradeData {
            id: r.trade.id,
            reason: "cumulative totals exceed the representable range".to_string(),
        };
        if r.net_profit > Decimal::ZERO {
            gross_profit = gross_profit.checked_add(r.net_profit).ok_or_else(out_of_range)?;
        } else {
            gross_loss = gross_loss.checked_add(r.net_profit.abs()).ok_or_else(out_of_range)?;
        }
        total_fees = total_fees.checked_add(r.trade.fees).ok_or_else(out_of_range)?;
        gross_profit.checked_add(gross_loss).ok_or_else(out_of_range)?;
    }
    Ok(())
}

/// A finite quotient, or `Unbounded` when a positive quotient is too large to
/// represent. The denominator must be positive.
fn divide(numerator: Decimal, denominator: Decimal) -> Ratio {
    match numerator.checked_div(denominator) {
        Some(value) => Ratio::Finite(value),
        None if numerator > Decimal::ZERO => Ratio::Unbounded,
        None => Ratio::Undefined,
    }
}

/// Mean over population standard deviation of net profit per trade.
///
/// Deviations are scaled by the largest one before squaring, which keeps the
/// variance sum within `[0, count]` however large the individual results are.
fn trade_sharpe(realized: &[Realized<'_>], total_net_profit: Decimal) -> Option<Decimal> {
    if realized.len() < 2 {
        return None;
    }
    let count = Decimal::from(realized.len());
    let mean = total_net_profit.checked_div(count)?;

    let deviations: Vec<Decimal> = realized
        .iter()
        .map(|r| r.net_profit.checked_sub(mean))
        .collect::<Option<_>>()?;
    let scale = deviations
        .iter()
        .map(|d| d.abs())
        .max()
        .filter(|scale| *scale > Decimal::ZERO)?;

    let scaled_variance = deviations
        .iter()
        .try_fold(Decimal::ZERO, |acc, d| {
            let unit = d.checked_div(scale)?;
            acc.checked_add(unit.checked_mul(unit)?)
        })?
        .checked_div(count)?;
    let std_dev = scaled_variance.sqrt()?.checked_mul(scale)?;
    if std_dev <= Decimal::ZERO {
        return None;
    }
    mean.checked_div(std_dev)
}

/// Convenience wrapper around [`AnalyticsEngine::compute_report`].
pub fn compute_report(
    trades: &[Trade],
    filter: &ReportFilter,
) -> Result<MetricsReport, AnalyticsError> {
    AnalyticsEngine::new().compute_report(trades, filter)
}
