//! Price data source port.

use crate::domain::error::DashboardError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `symbol` with `start <= date <= end`.
    ///
    /// An unknown symbol or a window without trading days is an empty
    /// series, not an error.
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DashboardError>;

    fn list_symbols(&self) -> Result<Vec<String>, DashboardError>;

    /// First date, last date and bar count held for `symbol`.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DashboardError>;
}
