//! One dashboard render: fetch, derive, format.
//!
//! [`Dashboard`] pairs the fetched series with its [`DerivedMetrics`];
//! [`DashboardView`] turns those into the display strings every front end
//! (console, HTML file, web) shows.

use std::fmt;

use tracing::{debug, warn};

use crate::domain::date_range::{DATE_FORMAT, DateRange};
use crate::domain::metrics::{ChangeDirection, DerivedMetrics};
use crate::domain::ohlcv::PriceSeries;
use crate::ports::data_port::DataPort;

pub const UNAVAILABLE: &str = "N/A";

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub symbol: String,
    pub range: DateRange,
    pub quantity: Option<f64>,
    pub series: PriceSeries,
    pub metrics: DerivedMetrics,
}

impl Dashboard {
    pub fn new(symbol: &str, range: DateRange, quantity: Option<f64>, series: PriceSeries) -> Self {
        let metrics = DerivedMetrics::compute(&series, quantity);
        Self {
            symbol: symbol.to_uppercase(),
            range,
            quantity,
            series,
            metrics,
        }
    }

    /// Fetches `symbol` over `range`. A failing data source degrades to an
    /// empty series so every value renders as N/A instead of aborting.
    pub fn load(
        data_port: &dyn DataPort,
        symbol: &str,
        range: DateRange,
        quantity: Option<f64>,
    ) -> Self {
        let series = match data_port.fetch_ohlcv(symbol, range.start, range.end) {
            Ok(series) => series,
            Err(e) => {
                warn!(symbol, %range, error = %e, "price fetch failed, showing empty dashboard");
                PriceSeries::empty()
            }
        };

        let inconsistent = series.iter().filter(|b| !b.is_consistent()).count();
        if inconsistent > 0 {
            warn!(symbol, inconsistent, "bars with high/low outside open/close");
        }
        debug!(symbol, bars = series.len(), %range, "loaded price series");

        Self::new(symbol, range, quantity, series)
    }

    pub fn title(&self) -> String {
        format!("{} Stock Explorer", self.symbol)
    }

    pub fn view(&self) -> DashboardView {
        let m = &self.metrics;
        let (direction_icon, direction_class) = direction_style(m.direction);

        let snapshot_rows = match &m.latest_snapshot {
            Some(snapshot) => snapshot
                .fields
                .iter()
                .map(|(field, value)| SnapshotRow {
                    category: field.label(),
                    value: value.clone(),
                })
                .collect(),
            None => Vec::new(),
        };

        DashboardView {
            title: self.title(),
            symbol: self.symbol.clone(),
            start: self.range.start.format(DATE_FORMAT).to_string(),
            end: self.range.end.format(DATE_FORMAT).to_string(),
            quantity: self.quantity.map(|q| q.to_string()).unwrap_or_default(),
            price: format_price(m.latest_close),
            change: format_currency(m.change),
            change_percent: format_percent(m.change_percent),
            total_value: format_currency(m.position_value),
            direction_icon,
            direction_class,
            snapshot_date: m
                .latest_snapshot
                .as_ref()
                .map(|s| s.date.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| UNAVAILABLE.to_string()),
            snapshot_rows,
            bar_count: self.series.len(),
        }
    }
}

fn direction_style(direction: ChangeDirection) -> (&'static str, &'static str) {
    match direction {
        ChangeDirection::Up => ("arrow-up", "text-success"),
        ChangeDirection::Down => ("arrow-down", "text-danger"),
        ChangeDirection::Unavailable => ("minus", "text-muted"),
    }
}

pub fn format_price(value: Option<f64>) -> String {
    value.map_or_else(|| UNAVAILABLE.to_string(), |v| format!("{v:.2}"))
}

pub fn format_currency(value: Option<f64>) -> String {
    value.map_or_else(|| UNAVAILABLE.to_string(), |v| format!("${v:.2}"))
}

pub fn format_percent(value: Option<f64>) -> String {
    value.map_or_else(|| UNAVAILABLE.to_string(), |v| format!("{v:.2}%"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub category: &'static str,
    pub value: String,
}

/// Display strings for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub title: String,
    pub symbol: String,
    pub start: String,
    pub end: String,
    pub quantity: String,
    pub price: String,
    pub change: String,
    pub change_percent: String,
    pub total_value: String,
    pub direction_icon: &'static str,
    pub direction_class: &'static str,
    pub snapshot_date: String,
    pub snapshot_rows: Vec<SnapshotRow>,
    pub bar_count: usize,
}

impl DashboardView {
    pub fn direction_glyph(&self) -> &'static str {
        match self.direction_icon {
            "arrow-up" => "▲",
            "arrow-down" => "▼",
            _ => "–",
        }
    }
}

/// Plain-text rendering for the terminal.
impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{} to {} ({} bars)", self.start, self.end, self.bar_count)?;
        writeln!(f)?;
        writeln!(f, "Current Price:   {}", self.price)?;
        writeln!(f, "Change:          {} {}", self.change, self.direction_glyph())?;
        writeln!(f, "Percent Change:  {}", self.change_percent)?;
        writeln!(f, "Total Value:     {}", self.total_value)?;
        writeln!(f)?;
        writeln!(f, "Latest data ({})", self.snapshot_date)?;
        if self.snapshot_rows.is_empty() {
            writeln!(f, "  {UNAVAILABLE}")?;
        }
        for row in &self.snapshot_rows {
            writeln!(f, "  {:<8} {:>16}", row.category, row.value)?;
        }
        Ok(())
    }
}
