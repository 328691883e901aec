//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::adapters::chart_svg::{EMPTY_CHART, candlestick_svg, placeholder_svg};
use crate::domain::dashboard::Dashboard;
use crate::domain::date_range::{DATE_FORMAT, DateRange, parse_date};
use crate::domain::metrics::DerivedMetrics;
use crate::domain::symbol::normalize_symbol;

use super::templates::{DashboardFragment, DashboardPage};
use super::{AppState, WebError, is_htmx_request};

/// Control values as submitted by the dashboard form. Everything arrives as
/// text so that cleared inputs (`quantity=`) are distinguishable from absent
/// ones.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct DashboardQuery {
    pub symbol: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub quantity: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<chrono::NaiveDate>, WebError> {
    non_blank(value)
        .map(parse_date)
        .transpose()
        .map_err(WebError::from)
}

/// Absent quantity takes the configured default. A cleared or unparsable
/// one leaves the position value unavailable.
fn resolve_quantity(raw: Option<&str>, default: f64) -> Option<f64> {
    match raw.map(str::trim) {
        None => Some(default),
        Some(value) => value.parse::<f64>().ok(),
    }
}

fn load_dashboard(state: &AppState, query: &DashboardQuery) -> Result<Dashboard, WebError> {
    let symbol = match non_blank(query.symbol.as_deref()) {
        Some(raw) => normalize_symbol(raw)?,
        None => state.settings.symbol.clone(),
    };
    let start = parse_optional_date(query.start.as_deref())?;
    let end = parse_optional_date(query.end.as_deref())?;
    let range = DateRange::resolve(start, end, state.today(), state.settings.lookback_weeks)?;
    let quantity = resolve_quantity(query.quantity.as_deref(), state.settings.default_quantity);

    Ok(Dashboard::load(
        state.data_port.as_ref(),
        &symbol,
        range,
        quantity,
    ))
}

/// Data ports are blocking, so loads run off the async workers.
async fn load_blocking(state: Arc<AppState>, query: DashboardQuery) -> Result<Dashboard, WebError> {
    tokio::task::spawn_blocking(move || load_dashboard(&state, &query))
        .await
        .map_err(|e| WebError::internal(format!("dashboard task failed: {e}")))?
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let min_quantity = state.settings.min_quantity;
    let max_quantity = state.settings.max_quantity;
    let dashboard = load_blocking(state, query).await?;
    let view = dashboard.view();
    let chart = candlestick_svg(&dashboard.series);
    let chart_svg = chart.as_deref().unwrap_or(EMPTY_CHART);

    let rendered = if is_htmx_request(&headers) {
        DashboardFragment {
            view: &view,
            chart_svg,
        }
        .render()
    } else {
        DashboardPage {
            title: &view.title,
            view: &view,
            chart_svg,
            min_quantity,
            max_quantity,
        }
        .render()
    };

    let html = rendered.map_err(|e| WebError::internal(format!("template error: {e}")))?;
    Ok(Html(html).into_response())
}

pub async fn chart_svg(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, WebError> {
    let dashboard = load_blocking(state, query).await?;
    let svg = candlestick_svg(&dashboard.series).unwrap_or_else(placeholder_svg);
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

#[derive(Debug, serde::Serialize)]
pub struct MetricsResponse {
    pub symbol: String,
    pub start: String,
    pub end: String,
    pub quantity: Option<f64>,
    pub bars: usize,
    pub metrics: DerivedMetrics,
}

pub async fn metrics_json(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<MetricsResponse>, WebError> {
    let dashboard = load_blocking(state, query).await?;
    Ok(Json(MetricsResponse {
        symbol: dashboard.symbol,
        start: dashboard.range.start.format(DATE_FORMAT).to_string(),
        end: dashboard.range.end.format(DATE_FORMAT).to_string(),
        quantity: dashboard.quantity,
        bars: dashboard.series.len(),
        metrics: dashboard.metrics,
    }))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_absent_uses_default() {
        assert_eq!(resolve_quantity(None, 5.0), Some(5.0));
    }

    #[test]
    fn quantity_cleared_or_garbage_is_unavailable() {
        assert_eq!(resolve_quantity(Some(""), 5.0), None);
        assert_eq!(resolve_quantity(Some("ten"), 5.0), None);
        assert_eq!(resolve_quantity(Some(" 12 "), 5.0), Some(12.0));
    }

    #[test]
    fn blank_dates_are_absent() {
        assert_eq!(parse_optional_date(Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert!(parse_optional_date(Some("01/02/2024")).is_err());
    }
}
