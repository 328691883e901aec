//! OHLCV bars and the date-ordered series the dashboard works on.

use std::ops::Deref;

use chrono::NaiveDate;

use super::error::DashboardError;

/// One daily OHLCV observation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "web", derive(serde::Serialize))]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// low <= min(open, close) <= max(open, close) <= high
    ///
    /// Upstream feeds do not guarantee this, so nothing downstream relies on it.
    pub fn is_consistent(&self) -> bool {
        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        self.low <= body_low && body_high <= self.high
    }

    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// Bars in strictly ascending date order with no duplicate dates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Takes bars as-is, rejecting any that break the ordering invariant.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, DashboardError> {
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(DashboardError::UnorderedSeries {
                    previous: pair[0].date,
                    date: pair[1].date,
                });
            }
        }
        Ok(Self { bars })
    }

    /// Sorts by date; for a repeated date the bar seen last wins.
    pub fn from_unordered(mut bars: Vec<PriceBar>) -> Self {
        // stable sort keeps input order among equal dates
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }
        Self { bars: deduped }
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

impl Deref for PriceSeries {
    type Target = [PriceBar];

    fn deref(&self) -> &Self::Target {
        &self.bars
    }
}
