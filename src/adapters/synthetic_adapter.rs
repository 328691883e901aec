//! Synthetic price data adapter.
//!
//! Generates a seeded random walk of daily bars for any symbol, so the
//! dashboard runs without a data feed. The walk always starts at `anchor`,
//! which makes a given (seed, symbol, date) produce the same bar no matter
//! which window is requested.

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::date_range::parse_date;
use crate::domain::error::DashboardError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_START_PRICE: f64 = 100.0;
pub const DEFAULT_ANCHOR: &str = "2015-01-02";
/// Bars are generated at most this many days past today.
pub const HORIZON_DAYS: u64 = 366;

pub struct SyntheticAdapter {
    seed: u64,
    start_price: f64,
    anchor: NaiveDate,
    symbols: Vec<String>,
}

impl SyntheticAdapter {
    pub fn new(seed: u64, start_price: f64, anchor: NaiveDate) -> Self {
        Self {
            seed,
            start_price,
            anchor,
            symbols: Vec::new(),
        }
    }

    /// Symbols reported by `list_symbols`; any symbol can still be fetched.
    pub fn with_symbols(mut self, symbols: Vec<String>) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, DashboardError> {
        let seed = config.get_int("synthetic", "seed", DEFAULT_SEED as i64) as u64;

        let start_price = config.get_double("synthetic", "start_price", DEFAULT_START_PRICE);
        if !(start_price.is_finite() && start_price > 0.0) {
            return Err(DashboardError::ConfigInvalid {
                section: "synthetic".into(),
                key: "start_price".into(),
                reason: "start_price must be positive".into(),
            });
        }

        let anchor_str = config.get_string_or("synthetic", "anchor", DEFAULT_ANCHOR);
        let anchor = parse_date(&anchor_str).map_err(|e| DashboardError::ConfigInvalid {
            section: "synthetic".into(),
            key: "anchor".into(),
            reason: e.to_string(),
        })?;

        let symbols = config
            .get_string("synthetic", "symbols")
            .map(|s| {
                s.split(',')
                    .map(|t| t.trim().to_uppercase())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self::new(seed, start_price, anchor).with_symbols(symbols))
    }

    fn walk(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<PriceBar> {
        let mut rng = StdRng::seed_from_u64(self.seed ^ fnv1a(&symbol.to_uppercase()));
        let mut bars = Vec::new();
        let mut close = self.start_price;
        let mut date = self.anchor;

        while date <= end {
            if is_trading_day(date) {
                let open = close * (1.0 + rng.gen_range(-0.01..0.01));
                let next_close = (open * (1.0 + rng.gen_range(-0.03..0.03))).max(0.01);
                let high = open.max(next_close) * (1.0 + rng.gen_range(0.0..0.015));
                let low = open.min(next_close) * (1.0 - rng.gen_range(0.0..0.015));
                let volume = rng.gen_range(1_000_000u64..50_000_000) as f64;

                if date >= start {
                    // cents rounding is monotonic, so high/low still bracket the body
                    bars.push(PriceBar {
                        date,
                        open: cents(open),
                        high: cents(high),
                        low: cents(low),
                        close: cents(next_close),
                        volume,
                    });
                }
                close = next_close;
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        bars
    }
}

fn horizon(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_days(Days::new(HORIZON_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

fn is_trading_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Stable across builds, unlike `DefaultHasher`.
fn fnv1a(s: &str) -> u64 {
    s.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

impl DataPort for SyntheticAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DashboardError> {
        let end_date = end_date.min(horizon(Local::now().date_naive()));
        if symbol.trim().is_empty() || end_date < self.anchor || start_date > end_date {
            return Ok(PriceSeries::empty());
        }
        PriceSeries::new(self.walk(symbol, start_date, end_date))
    }

    fn list_symbols(&self) -> Result<Vec<String>, DashboardError> {
        let mut symbols = self.symbols.clone();
        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DashboardError> {
        let today = Local::now().date_naive();
        let series = self.fetch_ohlcv(symbol, self.anchor, today)?;
        Ok(series
            .first_date()
            .zip(series.last_date())
            .map(|(first, last)| (first, last, series.len())))
    }
}
