//! Billing period representation
//!
//! A billing period is an explicit date range, at most one year plus a day
//! long. Both dates are inclusive.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default upper bound on `end - start`, in days
pub const MAX_PERIOD_DAYS: i64 = 366;

/// A billing period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingPeriod {
    /// Create a period, checking it against the given maximum length
    pub fn new(start: NaiveDate, end: NaiveDate, max_days: i64) -> Result<Self, PeriodError> {
        let period = Self { start, end };
        period.check(max_days)?;
        Ok(period)
    }

    /// The full calendar year
    pub fn calendar_year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    /// The calendar year before the one containing `today`
    pub fn previous_year(today: NaiveDate) -> Self {
        let year = today.year() - 1;
        Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today),
            end: NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(today),
        }
    }

    /// Number of days between start and end
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Number of calendar days covered, both ends inclusive
    pub fn days(&self) -> i64 {
        self.span_days() + 1
    }

    /// Check the period is well-formed: start before end, span within `max_days`
    pub fn check(&self, max_days: i64) -> Result<(), PeriodError> {
        if self.start >= self.end {
            return Err(PeriodError::NotAfterStart {
                start: self.start,
                end: self.end,
            });
        }
        let span = self.span_days();
        if span > max_days {
            return Err(PeriodError::TooLong {
                days: span,
                max_days,
            });
        }
        Ok(())
    }

    /// Parse a period from "YYYY" (calendar year) or "YYYY-MM-DD..YYYY-MM-DD"
    pub fn parse(s: &str, max_days: i64) -> Result<Self, PeriodError> {
        let s = s.trim();

        if let Some((start, end)) = s.split_once("..") {
            let start = parse_date(start)?;
            let end = parse_date(end)?;
            return Self::new(start, end, max_days);
        }

        if let Ok(year) = s.parse::<i32>() {
            if let Some(period) = Self::calendar_year(year) {
                return Ok(period);
            }
        }

        Err(PeriodError::InvalidFormat(s.to_string()))
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, PeriodError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d.%m.%Y"))
        .map_err(|_| PeriodError::InvalidFormat(s.to_string()))
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Reasons a period is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    NotAfterStart { start: NaiveDate, end: NaiveDate },
    TooLong { days: i64, max_days: i64 },
    InvalidFormat(String),
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAfterStart { start, end } => {
                write!(f, "Period end {} must be after start {}", end, start)
            }
            Self::TooLong { days, max_days } => {
                write!(f, "Period spans {} days, at most {} allowed", days, max_days)
            }
            Self::InvalidFormat(s) => write!(
                f,
                "Invalid period '{}'. Use YYYY or YYYY-MM-DD..YYYY-MM-DD",
                s
            ),
        }
    }
}

impl std::error::Error for PeriodError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_previous_year() {
        let period = BillingPeriod::previous_year(date(2026, 10, 19));
        assert_eq!(period.start, date(2025, 1, 1));
        assert_eq!(period.end, date(2025, 12, 31));
        assert_eq!(period.days(), 365);
    }

    #[test]
    fn test_start_must_precede_end() {
        let err = BillingPeriod::new(date(2025, 5, 1), date(2025, 5, 1), MAX_PERIOD_DAYS);
        assert!(matches!(err, Err(PeriodError::NotAfterStart { .. })));

        let err = BillingPeriod::new(date(2025, 5, 2), date(2025, 5, 1), MAX_PERIOD_DAYS);
        assert!(err.is_err());
    }

    #[test]
    fn test_length_boundary_is_inclusive() {
        // Exactly 366 days apart is allowed
        assert!(BillingPeriod::new(date(2024, 1, 1), date(2025, 1, 1), MAX_PERIOD_DAYS).is_ok());

        let err = BillingPeriod::new(date(2024, 1, 1), date(2025, 1, 2), MAX_PERIOD_DAYS);
        assert_eq!(
            err,
            Err(PeriodError::TooLong {
                days: 367,
                max_days: 366
            })
        );
    }

    #[test]
    fn test_parse() {
        let year = BillingPeriod::parse("2024", MAX_PERIOD_DAYS).unwrap();
        assert_eq!(year.start, date(2024, 1, 1));
        assert_eq!(year.end, date(2024, 12, 31));

        let range = BillingPeriod::parse("2024-07-01..2025-06-30", MAX_PERIOD_DAYS).unwrap();
        assert_eq!(range.start, date(2024, 7, 1));

        let german = BillingPeriod::parse("01.07.2024..30.06.2025", MAX_PERIOD_DAYS).unwrap();
        assert_eq!(german, range);

        assert!(BillingPeriod::parse("last year", MAX_PERIOD_DAYS).is_err());
    }
}
