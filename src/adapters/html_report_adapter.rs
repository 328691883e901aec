//! HTML report adapter implementing ReportPort.
//!
//! Writes a standalone dashboard page (value boxes, inline SVG chart and the
//! latest-data table) rendered with Askama.

use std::fs;
use std::path::Path;

use askama::Template;
use chrono::Local;
use tracing::info;

use crate::adapters::chart_svg::{EMPTY_CHART, candlestick_svg};
use crate::domain::dashboard::{Dashboard, DashboardView};
use crate::domain::error::DashboardError;
use crate::ports::report_port::ReportPort;

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    title: &'a str,
    view: &'a DashboardView,
    chart_svg: &'a str,
    generated_at: String,
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, dashboard: &Dashboard) -> Result<String, DashboardError> {
        let view = dashboard.view();
        let chart_svg = candlestick_svg(&dashboard.series);

        let template = ReportTemplate {
            title: &view.title,
            view: &view,
            chart_svg: chart_svg.as_deref().unwrap_or(EMPTY_CHART),
            generated_at: Local::now().format("%Y-%m-%d %H:%M").to_string(),
        };

        template.render().map_err(|e| DashboardError::Render {
            reason: e.to_string(),
        })
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, dashboard: &Dashboard, output_path: &Path) -> Result<(), DashboardError> {
        let html = self.render(dashboard)?;

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, html)?;

        info!(path = %output_path.display(), symbol = %dashboard.symbol, "wrote dashboard report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::date_range::DateRange;
    use crate::domain::ohlcv::{PriceBar, PriceSeries};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn sample_dashboard() -> Dashboard {
        let bars = vec![
            PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                open: 101.0,
                high: 104.0,
                low: 100.0,
                close: 103.0,
                volume: 52_000_000.0,
            },
            PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                open: 102.5,
                high: 103.0,
                low: 99.0,
                close: 100.0,
                volume: 61_000_000.0,
            },
        ];
        Dashboard::new(
            "AAPL",
            DateRange::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            )
            .unwrap(),
            Some(10.0),
            PriceSeries::new(bars).unwrap(),
        )
    }

    #[test]
    fn write_creates_file_with_value_boxes() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("dashboard.html");

        HtmlReportAdapter::new()
            .write(&sample_dashboard(), &output_path)
            .unwrap();

        let contents = fs::read_to_string(&output_path).unwrap();
        assert!(contents.contains("AAPL Stock Explorer"));
        assert!(contents.contains("Current Price"));
        assert!(contents.contains("100.00"));
        assert!(contents.contains("$-3.00"));
        assert!(contents.contains("-2.91%"));
        assert!(contents.contains("$1000.00"));
        assert!(contents.contains("text-danger"));
    }

    #[test]
    fn includes_chart_and_latest_table() {
        let html = HtmlReportAdapter::new().render(&sample_dashboard()).unwrap();
        assert!(html.contains("Price history and volume"));
        assert!(html.contains("<svg"));
        assert!(html.contains("Latest data"));
        assert!(html.contains("<td>Open</td><td>102.5</td>"));
        assert!(html.contains("<td>Volume</td><td>61000000.0</td>"));
    }

    #[test]
    fn empty_dashboard_renders_placeholders() {
        let dashboard = Dashboard::new(
            "ZZZZ",
            DateRange::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            )
            .unwrap(),
            None,
            PriceSeries::empty(),
        );
        let html = HtmlReportAdapter::new().render(&dashboard).unwrap();
        assert!(html.contains("N/A"));
        assert!(html.contains("No price data available."));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("nested/deep/path/dashboard.html");

        HtmlReportAdapter::new()
            .write(&sample_dashboard(), &output_path)
            .unwrap();

        assert!(output_path.exists());
    }
}
