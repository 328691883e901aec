//! Web server adapter.
//!
//! Serves the dashboard over Axum. The page carries an HTMX form that
//! re-requests `/` with `HX-Request` set, and the handler answers those with
//! the dashboard fragment only.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{Router, routing::get};
use chrono::{Local, NaiveDate};
use std::sync::Arc;

use crate::domain::settings::DashboardSettings;
use crate::ports::data_port::DataPort;

pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    pub settings: DashboardSettings,
    /// Pins "today" for date range defaults; `None` reads the local clock.
    pub today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(data_port: Arc<dyn DataPort + Send + Sync>, settings: DashboardSettings) -> Self {
        Self {
            data_port,
            settings,
            today: None,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/chart.svg", get(handlers::chart_svg))
        .route("/api/metrics", get(handlers::metrics_json))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
