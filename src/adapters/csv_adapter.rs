//! CSV file data adapter.
//!
//! One file per symbol, `<SYMBOL>.csv`, with the header
//! `date,open,high,low,close,volume`.

use crate::domain::date_range::DateRange;
use crate::domain::error::DashboardError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::domain::symbol::normalize_symbol;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Only validated symbols become file names, so lookups stay inside
    /// `base_path`.
    fn csv_path(&self, symbol: &str) -> Result<PathBuf, DashboardError> {
        let symbol = normalize_symbol(symbol)?;
        Ok(self.base_path.join(format!("{symbol}.csv")))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<PriceBar>, DashboardError> {
        let path = self.csv_path(symbol)?;
        if !path.exists() {
            debug!(symbol, path = %path.display(), "no csv file for symbol");
            return Ok(Vec::new());
        }
        read_bars(&path)
    }
}

/// Parses every row of an OHLCV csv file, in file order.
pub fn read_bars(path: &Path) -> Result<Vec<PriceBar>, DashboardError> {
    let content = fs::read_to_string(path).map_err(|e| DashboardError::DataSource {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;

    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut bars = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| DashboardError::DataSource {
            reason: format!("CSV parse error: {}", e),
        })?;

        let date_str = column(&record, 0, "date")?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            DashboardError::DataSource {
                reason: format!("invalid date format: {}", e),
            }
        })?;

        bars.push(PriceBar {
            date,
            open: number(&record, 1, "open")?,
            high: number(&record, 2, "high")?,
            low: number(&record, 3, "low")?,
            close: number(&record, 4, "close")?,
            volume: number(&record, 5, "volume")?,
        });
    }

    Ok(bars)
}

fn column<'r>(record: &'r StringRecord, idx: usize, name: &str) -> Result<&'r str, DashboardError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| DashboardError::DataSource {
            reason: format!("missing {} column", name),
        })
}

fn number(record: &StringRecord, idx: usize, name: &str) -> Result<f64, DashboardError> {
    column(record, idx, name)?
        .parse()
        .map_err(|e| DashboardError::DataSource {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DashboardError> {
        let range = DateRange::new(start_date, end_date)?;
        let bars = self
            .read_all(symbol)?
            .into_iter()
            .filter(|b| range.contains(b.date))
            .collect();
        Ok(PriceSeries::from_unordered(bars))
    }

    fn list_symbols(&self) -> Result<Vec<String>, DashboardError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| DashboardError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| DashboardError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_uppercase());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DashboardError> {
        let series = PriceSeries::from_unordered(self.read_all(symbol)?);
        Ok(series
            .first_date()
            .zip(series.last_date())
            .map(|(first, last)| (first, last, series.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000.5\n";

        fs::write(path.join("AAPL.csv"), csv_content).unwrap();
        fs::write(path.join("MSFT.csv"), "date,open,high,low,close,volume\n").unwrap();
        fs::write(path.join("notes.txt"), "ignored").unwrap();

        (dir, path)
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn fetch_ohlcv_returns_sorted_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_ohlcv("AAPL", d(15), d(17)).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, d(15));
        assert_eq!(series[0].open, 100.0);
        assert_eq!(series[0].high, 110.0);
        assert_eq!(series[0].low, 90.0);
        assert_eq!(series[0].close, 105.0);
        assert_eq!(series[0].volume, 50000.0);
        assert_eq!(series[1].volume, 60000.5);
        assert_eq!(series[2].date, d(17));
    }

    #[test]
    fn fetch_ohlcv_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_ohlcv("AAPL", d(16), d(16)).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, d(16));
    }

    #[test]
    fn symbol_lookup_is_case_insensitive() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_ohlcv("aapl", d(1), d(31)).unwrap();
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn fetch_ohlcv_returns_empty_for_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_ohlcv("XYZ", d(1), d(31)).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn fetch_ohlcv_rejects_malformed_rows() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("BAD.csv"),
            "date,open,high,low,close,volume\n2024-01-15,abc,1,1,1,1\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch_ohlcv("BAD", d(1), d(31)).unwrap_err();
        assert!(err.to_string().contains("invalid open value"));
    }

    #[test]
    fn symbols_cannot_escape_data_directory() {
        let root = TempDir::new().unwrap();
        let data = root.path().join("data");
        let private = root.path().join("PRIVATE");
        fs::create_dir_all(&data).unwrap();
        fs::create_dir_all(&private).unwrap();
        fs::write(
            private.join("X.csv"),
            "date,open,high,low,close,volume\n2024-01-15,42,42,42,42,1\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(data);

        for symbol in ["../private/x", "../PRIVATE/X"] {
            let err = adapter.fetch_ohlcv(symbol, d(1), d(31)).unwrap_err();
            assert!(matches!(err, DashboardError::InvalidSymbol { .. }), "{symbol}");
        }
        let absolute = private.join("X").display().to_string();
        assert!(adapter.fetch_ohlcv(&absolute, d(1), d(31)).is_err());
        assert!(adapter.get_data_range("../private/x").is_err());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.fetch_ohlcv("AAPL", d(17), d(15)),
            Err(DashboardError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert_eq!(adapter.list_symbols().unwrap(), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn data_range_reports_bounds() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert_eq!(
            adapter.get_data_range("AAPL").unwrap(),
            Some((d(15), d(17), 3))
        );
        assert_eq!(adapter.get_data_range("MSFT").unwrap(), None);
        assert_eq!(adapter.get_data_range("XYZ").unwrap(), None);
    }
}
