use analytics::MetricsReport;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use configuration::ReportSettings;
use rust_decimal::Decimal;
use std::time::Duration;

/// One-line description of the active report restrictions.
pub fn describe_filter(settings: &ReportSettings) -> String {
    let mut parts = Vec::new();
    if let Some(symbol) = &settings.symbol {
        parts.push(format!("symbol={symbol}"));
    }
    if let Some(direction) = settings.direction {
        parts.push(format!("direction={direction}"));
    }
    match (settings.from, settings.to) {
        (Some(from), Some(to)) => parts.push(format!("exits {from}..={to}")),
        (Some(from), None) => parts.push(format!("exits from {from}")),
        (None, Some(to)) => parts.push(format!("exits until {to}")),
        (None, None) => {}
    }
    if parts.is_empty() {
        "Report over all closed trades".to_string()
    } else {
        format!("Report over closed trades with {}", parts.join(", "))
    }
}

/// Renders the scalar part of a report as a two-column table.
pub fn summary_table(report: &MetricsReport) -> Table {
    let rows: Vec<(&str, String)> = vec![
        ("Closed trades", report.total_trades.to_string()),
        (
            "Winning / losing / breakeven",
            format!(
                "{} / {} / {}",
                report.winning_trades, report.losing_trades, report.breakeven_trades
            ),
        ),
        ("Win rate", format!("{}%", money(report.win_rate * Decimal::from(100)))),
        ("Total net profit", money(report.total_net_profit)),
        ("Gross profit", money(report.gross_profit)),
        ("Gross loss", money(report.gross_loss)),
        ("Total fees", money(report.total_fees)),
        ("Average win", money(report.average_win)),
        ("Average loss", money(report.average_loss)),
        ("Largest win", money(report.largest_win)),
        ("Largest loss", money(report.largest_loss)),
        ("Expectancy", money(report.expectancy)),
        ("Profit factor", report.profit_factor.to_string()),
        ("Payoff ratio", report.payoff_ratio.to_string()),
        ("Max drawdown", money(report.max_drawdown)),
        ("Recovery factor", report.recovery_factor.to_string()),
        (
            "Trade Sharpe",
            report
                .trade_sharpe
                .map(|s| s.round_dp(4).to_string())
                .unwrap_or_else(|| "n/a".to_string()),
        ),
        ("Max consecutive wins", report.max_consecutive_wins.to_string()),
        ("Max consecutive losses", report.max_consecutive_losses.to_string()),
        ("Average holding period", holding(report.average_holding_period)),
    ];

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);
    for (metric, value) in rows {
        table.add_row(vec![metric.to_string(), value]);
    }
    table
}

fn money(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

/// Whole seconds only; sub-second noise from averaging is dropped.
fn holding(duration: Duration) -> String {
    humantime::format_duration(Duration::from_secs(duration.as_secs())).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::Direction;
    use rust_decimal_macros::dec;

    #[test]
    fn describes_unrestricted_and_restricted_filters() {
        assert_eq!(
            describe_filter(&ReportSettings::default()),
            "Report over all closed trades"
        );
        let settings = ReportSettings {
            symbol: Some("ETHUSD".into()),
            direction: Some(Direction::Long),
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            to: None,
        };
        assert_eq!(
            describe_filter(&settings),
            "Report over closed trades with symbol=ETHUSD, direction=long, exits from 2024-01-01"
        );
    }

    #[test]
    fn holding_period_formatting() {
        assert_eq!(holding(Duration::from_secs(150 * 60)), "2h 30m");
        assert_eq!(holding(Duration::from_secs(26 * 3600 + 5 * 60)), "1day 2h 5m");
        assert_eq!(holding(Duration::from_millis(90_250)), "1m 30s");
        assert_eq!(holding(Duration::ZERO), "0s");
    }

    #[test]
    fn table_lists_every_metric() {
        let mut report = MetricsReport::new();
        report.total_trades = 3;
        report.win_rate = dec!(0.5);
        let rendered = summary_table(&report).to_string();
        assert!(rendered.contains("Win rate"));
        assert!(rendered.contains("50.0%") || rendered.contains("50%"));
        assert!(rendered.contains("Average holding period"));
    }
}
