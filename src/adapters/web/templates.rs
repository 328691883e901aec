//! HTML templates using Askama.

use askama::Template;

use crate::domain::dashboard::DashboardView;

/// Full page: controls sidebar plus the dashboard body.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage<'a> {
    pub title: &'a str,
    pub view: &'a DashboardView,
    pub chart_svg: &'a str,
    pub min_quantity: f64,
    pub max_quantity: f64,
}

/// The `#dashboard` element alone, swapped in by HTMX.
#[derive(Template)]
#[template(path = "dashboard_content.html")]
pub struct DashboardFragment<'a> {
    pub view: &'a DashboardView,
    pub chart_svg: &'a str,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub status: u16,
}
