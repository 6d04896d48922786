//! Reporting Period Module
//! Calendar year-month key used as the only filter dimension.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid period '{0}', expected YYYY-MM")]
pub struct PeriodParseError(pub String);

/// A calendar month, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Truncate a date to its calendar month.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Number of days in this month.
    pub fn days(&self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        match (
            NaiveDate::from_ymd_opt(self.year, self.month, 1),
            NaiveDate::from_ymd_opt(next_year, next_month, 1),
        ) {
            (Some(start), Some(end)) => (end - start).num_days() as u32,
            _ => 31,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| PeriodParseError(s.to_string()))?;
        let year: i32 = year.parse().map_err(|_| PeriodParseError(s.to_string()))?;
        let month: u32 = month.parse().map_err(|_| PeriodParseError(s.to_string()))?;
        Period::new(year, month).ok_or_else(|| PeriodParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_as_year_month() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(Period::from_date(date).to_string(), "2025-01");
    }

    #[test]
    fn parses_and_rejects() {
        assert_eq!("2024-12".parse::<Period>(), Ok(Period::new(2024, 12).unwrap()));
        assert!("2024-13".parse::<Period>().is_err());
        assert!("december".parse::<Period>().is_err());
    }

    #[test]
    fn contains_only_its_month() {
        let period = Period::new(2025, 2).unwrap();
        assert!(period.contains(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()));
        assert_eq!(period.days(), 28);
    }
}
