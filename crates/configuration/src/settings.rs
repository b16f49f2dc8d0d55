use crate::error::ConfigError;
use analytics::{DateRange, ReportFilter};
use chrono::NaiveDate;
use core_types::Direction;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

/// Where and how verbosely to log.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, e.g. "info" or "analytics=debug,info".
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_level")]
    pub level: String,
    /// When set, logs are also written to a daily-rotated file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Default restrictions applied when computing a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ReportSettings {
    /// Only include trades in this instrument (e.g., "AAPL").
    #[cfg_attr(feature = "clap", arg(long))]
    #[serde(default)]
    pub symbol: Option<String>,

    /// Only include long or short trades.
    #[cfg_attr(feature = "clap", arg(long))]
    #[serde(default)]
    pub direction: Option<Direction>,

    /// First exit day to include (format: YYYY-MM-DD).
    #[cfg_attr(feature = "clap", arg(long))]
    #[serde(default)]
    pub from: Option<NaiveDate>,

    /// Last exit day to include (format: YYYY-MM-DD).
    #[cfg_attr(feature = "clap", arg(long))]
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl ReportSettings {
    /// Field-wise merge where every value set in `overrides` wins.
    pub fn overridden_by(self, overrides: ReportSettings) -> Self {
        Self {
            symbol: overrides.symbol.or(self.symbol),
            direction: overrides.direction.or(self.direction),
            from: overrides.from.or(self.from),
            to: overrides.to.or(self.to),
        }
    }

    /// Builds the analytics filter. Missing bounds leave that side open.
    pub fn to_filter(&self) -> Result<ReportFilter, ConfigError> {
        let mut filter = ReportFilter::all();
        if let Some(symbol) = &self.symbol {
            filter = filter.for_symbol(symbol.clone());
        }
        if let Some(direction) = self.direction {
            filter = filter.direction(direction);
        }
        if self.from.is_some() || self.to.is_some() {
            let from = self.from.unwrap_or(NaiveDate::MIN);
            let to = self.to.unwrap_or(NaiveDate::MAX);
            let range = DateRange::days(from, to)
                .map_err(|e| ConfigError::InvalidFilter(e.to_string()))?;
            filter = filter.between(range);
        }
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn overrides_win_field_by_field() {
        let base = ReportSettings {
            symbol: Some("AAPL".into()),
            direction: Some(Direction::Long),
            from: Some(date(2024, 1, 1)),
            to: None,
        };
        let cli = ReportSettings {
            symbol: Some("MSFT".into()),
            to: Some(date(2024, 6, 30)),
            ..Default::default()
        };
        let merged = base.overridden_by(cli);
        assert_eq!(merged.symbol.as_deref(), Some("MSFT"));
        assert_eq!(merged.direction, Some(Direction::Long));
        assert_eq!(merged.from, Some(date(2024, 1, 1)));
        assert_eq!(merged.to, Some(date(2024, 6, 30)));
    }

    #[test]
    fn empty_settings_give_unrestricted_filter() {
        assert_eq!(ReportSettings::default().to_filter().unwrap(), ReportFilter::all());
    }

    #[test]
    fn open_ended_range_is_filled_in() {
        let settings = ReportSettings {
            from: Some(date(2024, 3, 1)),
            ..Default::default()
        };
        let range = settings.to_filter().unwrap().date_range.unwrap();
        assert_eq!(range.start().date_naive(), date(2024, 3, 1));
        assert_eq!(range.end().date_naive(), NaiveDate::MAX);
    }

    #[test]
    fn inverted_dates_fail_validation() {
        let settings = ReportSettings {
            from: Some(date(2024, 3, 2)),
            to: Some(date(2024, 3, 1)),
            ..Default::default()
        };
        assert!(matches!(
            settings.to_filter(),
            Err(ConfigError::InvalidFilter(_))
        ));
    }
}
