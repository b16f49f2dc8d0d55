use crate::error::AnalyticsError;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{Direction, Trade};
use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` window matched against a trade's exit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = AnalyticsError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::InvalidFilter(format!(
                "date range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Whole calendar days in UTC, from the first instant of `from` to the
    /// last instant of `to`.
    pub fn days(from: NaiveDate, to: NaiveDate) -> Result<Self, AnalyticsError> {
        let start = from
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| AnalyticsError::InvalidFilter(format!("invalid start date {from}")))?
            .and_utc();
        let end = to
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| AnalyticsError::InvalidFilter(format!("invalid end date {to}")))?
            .and_utc();
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// Restricts which closed trades a report is computed over.
///
/// Every field is optional; an absent field places no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub direction: Option<Direction>,
}

impl ReportFilter {
    /// A filter that accepts every trade.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn between(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Whether a trade passes every configured restriction.
    ///
    /// The date range is matched on exit time, so an open trade never passes
    /// a filter that carries one.
    pub fn matches(&self, trade: &Trade) -> bool {
        if let Some(symbol) = &self.symbol {
            if trade.symbol != *symbol {
                return false;
            }
        }
        if let Some(direction) = self.direction {
            if trade.direction != direction {
                return false;
            }
        }
        if let Some(range) = &self.date_range {
            match trade.exit_time() {
                Some(exit_time) => range.contains(exit_time),
                None => false,
            }
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use core_types::TradeId;
    use rust_decimal_macros::dec;

    fn closed_at(day: u32, symbol: &str, direction: Direction) -> Trade {
        let entry = Utc.with_ymd_and_hms(2024, 2, day, 9, 0, 0).unwrap();
        Trade::open(TradeId::new(), symbol, direction, dec!(50), dec!(3), entry)
            .close(dec!(51), entry + Duration::hours(1))
            .unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ReportFilter::all();
        assert!(filter.matches(&closed_at(1, "EURUSD", Direction::Long)));
        assert!(filter.matches(&closed_at(2, "GBPUSD", Direction::Short)));
    }

    #[test]
    fn symbol_and_direction_are_conjunctive() {
        let filter = ReportFilter::all()
            .for_symbol("EURUSD")
            .direction(Direction::Short);
        assert!(filter.matches(&closed_at(1, "EURUSD", Direction::Short)));
        assert!(!filter.matches(&closed_at(1, "EURUSD", Direction::Long)));
        assert!(!filter.matches(&closed_at(1, "GBPUSD", Direction::Short)));
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let trade = closed_at(5, "EURUSD", Direction::Long);
        let exit = trade.exit_time().unwrap();
        let exact = DateRange::new(exit, exit).unwrap();
        assert!(ReportFilter::all().between(exact).matches(&trade));

        let before =
            DateRange::new(exit - Duration::days(3), exit - Duration::seconds(1)).unwrap();
        assert!(!ReportFilter::all().between(before).matches(&trade));
    }

    #[test]
    fn whole_day_range_covers_late_exits() {
        let range = DateRange::days(
            NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
        )
        .unwrap();
        let late = Utc.with_ymd_and_hms(2024, 2, 5, 23, 59, 59).unwrap();
        assert!(range.contains(late));
        assert!(!range.contains(late + Duration::seconds(1)));
    }

    #[test]
    fn open_trade_never_matches_a_date_range() {
        let entry = Utc.with_ymd_and_hms(2024, 2, 5, 9, 0, 0).unwrap();
        let open = Trade::open(
            TradeId::new(),
            "EURUSD",
            Direction::Long,
            dec!(1),
            dec!(1),
            entry,
        );
        let range =
            DateRange::new(entry - Duration::days(1), entry + Duration::days(1)).unwrap();
        assert!(!ReportFilter::all().between(range).matches(&open));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let now = Utc.with_ymd_and_hms(2024, 2, 5, 9, 0, 0).unwrap();
        assert!(matches!(
            DateRange::new(now, now - Duration::seconds(1)),
            Err(AnalyticsError::InvalidFilter(_))
        ));
    }

    #[test]
    fn filter_deserializes_with_missing_fields() {
        let filter: ReportFilter = serde_json::from_str(r#"{"direction":"long"}"#).unwrap();
        assert_eq!(filter, ReportFilter::all().direction(Direction::Long));

        let inverted = r#"{"date_range":{
            "start":"2024-02-02T00:00:00Z",
            "end":"2024-02-01T00:00:00Z"
        }}"#;
        assert!(serde_json::from_str::<ReportFilter>(inverted).is_err());
    }
}
