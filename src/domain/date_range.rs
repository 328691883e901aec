//! Inclusive date window selected by the user.

use chrono::{Datelike, Duration, NaiveDate};

use super::error::DashboardError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Years accepted from user input. `%Y` alone admits signed years far
/// outside any price history.
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DashboardError> {
        if start > end {
            return Err(DashboardError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The `weeks`-long window ending on `end`.
    pub fn trailing(end: NaiveDate, weeks: u32) -> Result<Self, DashboardError> {
        let start = end
            .checked_sub_signed(Duration::weeks(i64::from(weeks)))
            .ok_or_else(|| DashboardError::InvalidDate {
                input: end.format(DATE_FORMAT).to_string(),
            })?;
        Ok(Self { start, end })
    }

    /// Fills in whichever ends are missing from a trailing default window.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
        lookback_weeks: u32,
    ) -> Result<Self, DashboardError> {
        let end = end.unwrap_or(today);
        let start = match start {
            Some(start) => start,
            None => Self::trailing(end, lookback_weeks)?.start,
        };
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, DashboardError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .ok()
        .filter(|d| (MIN_YEAR..=MAX_YEAR).contains(&d.year()))
        .ok_or_else(|| DashboardError::InvalidDate {
            input: input.to_string(),
        })
}
