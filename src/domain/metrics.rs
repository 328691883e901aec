//! Derived metrics over a price series.
//!
//! Every value here is optional. An empty or single-bar series, a zero prior
//! close, an absent or non-positive quantity, or a non-finite close all come
//! back as `None` (or [`ChangeDirection::Unavailable`]), never as an error or
//! a NaN. Nothing is cached: each call reads only its arguments.

use chrono::NaiveDate;

use super::ohlcv::{PriceBar, PriceSeries};

/// Close of the last bar.
pub fn latest_close(series: &PriceSeries) -> Option<f64> {
    series.last().map(|b| b.close).and_then(finite)
}

/// `close[last] - close[last-1]`. A single bar is never compared with itself.
pub fn change(series: &PriceSeries) -> Option<f64> {
    let (previous, latest) = last_two_closes(series)?;
    finite(latest - previous)
}

/// `change / close[last-1] * 100`, unavailable when the prior close is zero.
pub fn change_percent(series: &PriceSeries) -> Option<f64> {
    let (previous, latest) = last_two_closes(series)?;
    if previous == 0.0 {
        return None;
    }
    finite((latest - previous) / previous * 100.0)
}

/// `latest_close * quantity` for a positive quantity.
pub fn position_value(series: &PriceSeries, quantity: Option<f64>) -> Option<f64> {
    let quantity = quantity.filter(|q| q.is_finite() && *q > 0.0)?;
    finite(latest_close(series)? * quantity)
}

/// The most recent bar's five fields formatted to one decimal place.
pub fn latest_snapshot(series: &PriceSeries) -> Option<LatestSnapshot> {
    series.last().map(LatestSnapshot::from_bar)
}

pub fn change_direction(series: &PriceSeries) -> ChangeDirection {
    ChangeDirection::from_change(change(series))
}

fn last_two_closes(series: &PriceSeries) -> Option<(f64, f64)> {
    let [.., previous, latest] = &series[..] else {
        return None;
    };
    Some((finite(previous.close)?, finite(latest.close)?))
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Sign of the latest change. Zero counts as `Up`; there is no flat state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "web", derive(serde::Serialize))]
pub enum ChangeDirection {
    Up,
    Down,
    Unavailable,
}

impl ChangeDirection {
    pub fn from_change(change: Option<f64>) -> Self {
        match change {
            Some(c) if c >= 0.0 => ChangeDirection::Up,
            Some(_) => ChangeDirection::Down,
            None => ChangeDirection::Unavailable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "web", derive(serde::Serialize))]
pub enum SnapshotField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl SnapshotField {
    /// Presentation order.
    pub const ALL: [SnapshotField; 5] = [
        SnapshotField::Open,
        SnapshotField::High,
        SnapshotField::Low,
        SnapshotField::Close,
        SnapshotField::Volume,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SnapshotField::Open => "Open",
            SnapshotField::High => "High",
            SnapshotField::Low => "Low",
            SnapshotField::Close => "Close",
            SnapshotField::Volume => "Volume",
        }
    }

    pub fn value(self, bar: &PriceBar) -> f64 {
        match self {
            SnapshotField::Open => bar.open,
            SnapshotField::High => bar.high,
            SnapshotField::Low => bar.low,
            SnapshotField::Close => bar.close,
            SnapshotField::Volume => bar.volume,
        }
    }
}

/// Single-row projection of the latest bar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "web", derive(serde::Serialize))]
pub struct LatestSnapshot {
    pub date: NaiveDate,
    pub fields: [(SnapshotField, String); 5],
}

impl LatestSnapshot {
    pub fn from_bar(bar: &PriceBar) -> Self {
        Self {
            date: bar.date,
            fields: SnapshotField::ALL.map(|f| (f, format_one_decimal(f.value(bar)))),
        }
    }

    pub fn get(&self, field: SnapshotField) -> &str {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }
}

fn format_one_decimal(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.1}")
    } else {
        "N/A".to_string()
    }
}

/// Everything the presentation layer reads for one render.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "web", derive(serde::Serialize))]
pub struct DerivedMetrics {
    pub latest_close: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub direction: ChangeDirection,
    pub position_value: Option<f64>,
    pub latest_snapshot: Option<LatestSnapshot>,
}

impl DerivedMetrics {
    pub fn compute(series: &PriceSeries, quantity: Option<f64>) -> Self {
        let change = change(series);
        DerivedMetrics {
            latest_close: latest_close(series),
            change,
            change_percent: change_percent(series),
            direction: ChangeDirection::from_change(change),
            position_value: position_value(series, quantity),
            latest_snapshot: latest_snapshot(series),
        }
    }
}
