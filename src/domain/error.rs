//! Domain error types.
//!
//! The metrics engine never produces these: insufficient data is an explicit
//! `None` there. Errors only arise at the edges (config, data sources,
//! rendering).

use chrono::NaiveDate;

/// Top-level error type for stockdash.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid date '{input}' (expected YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("invalid symbol '{symbol}' (letters, digits, '.', '^' and '-' only)")]
    InvalidSymbol { symbol: String },

    #[error("price bars out of order: {date} does not follow {previous}")]
    UnorderedSeries { previous: NaiveDate, date: NaiveDate },

    #[error("render error: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&DashboardError> for std::process::ExitCode {
    fn from(err: &DashboardError) -> Self {
        let code: u8 = match err {
            DashboardError::Io(_) | DashboardError::Render { .. } => 1,
            DashboardError::ConfigParse { .. }
            | DashboardError::ConfigMissing { .. }
            | DashboardError::ConfigInvalid { .. }
            | DashboardError::InvalidDateRange { .. }
            | DashboardError::InvalidDate { .. }
            | DashboardError::InvalidSymbol { .. } => 2,
            DashboardError::DataSource { .. }
            | DashboardError::Database { .. }
            | DashboardError::DatabaseQuery { .. }
            | DashboardError::UnorderedSeries { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}
