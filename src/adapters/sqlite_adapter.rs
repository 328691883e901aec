//! SQLite data adapter.
//!
//! Bars live in a single `price_bars` table keyed by `(symbol, date)`.
//! Dates are stored as `YYYY-MM-DD` text so range queries compare correctly.

use crate::domain::error::DashboardError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn pool_err(e: r2d2::Error) -> DashboardError {
    DashboardError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> DashboardError {
    DashboardError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn parse_stored_date(s: &str) -> Result<NaiveDate, DashboardError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| DashboardError::Database {
        reason: format!("bad stored date '{}': {}", s, e),
    })
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, DashboardError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| DashboardError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4).clamp(1, 64) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(pool_err)?;

        info!(path = %db_path, pool_size, "opened sqlite price store");
        Ok(Self { pool })
    }

    /// Single-connection pool so every checkout sees the same in-memory db.
    pub fn in_memory() -> Result<Self, DashboardError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_err)?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, DashboardError> {
        self.pool.get().map_err(pool_err)
    }

    pub fn initialize_schema(&self) -> Result<(), DashboardError> {
        self.conn()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS price_bars (
                    symbol TEXT NOT NULL,
                    date TEXT NOT NULL,
                    open REAL NOT NULL,
                    high REAL NOT NULL,
                    low REAL NOT NULL,
                    close REAL NOT NULL,
                    volume REAL NOT NULL,
                    PRIMARY KEY (symbol, date)
                );
                CREATE INDEX IF NOT EXISTS idx_price_bars_date ON price_bars(date);",
            )
            .map_err(query_err)
    }

    /// Upserts `bars` for `symbol` in one transaction; returns rows written.
    pub fn insert_bars(&self, symbol: &str, bars: &[PriceBar]) -> Result<usize, DashboardError> {
        let symbol = symbol.to_uppercase();
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;

        let mut written = 0;
        for bar in bars {
            written += tx
                .execute(
                    "INSERT OR REPLACE INTO price_bars (symbol, date, open, high, low, close, volume)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        symbol,
                        bar.date.format(DATE_FORMAT).to_string(),
                        bar.open,
                        bar.high,
                        bar.low,
                        bar.close,
                        bar.volume
                    ],
                )
                .map_err(query_err)?;
        }

        tx.commit().map_err(query_err)?;
        debug!(symbol = %symbol, written, "inserted price bars");
        Ok(written)
    }
}

impl DataPort for SqliteAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DashboardError> {
        let conn = self.conn()?;

        let start_str = start_date.format(DATE_FORMAT).to_string();
        let end_str = end_date.format(DATE_FORMAT).to_string();

        let mut stmt = conn
            .prepare(
                "SELECT date, open, high, low, close, volume
                 FROM price_bars
                 WHERE symbol = ?1 AND date >= ?2 AND date <= ?3
                 ORDER BY date ASC",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![symbol.to_uppercase(), start_str, end_str], |row| {
                let date_str: String = row.get(0)?;
                let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(PriceBar {
                    date,
                    open: row.get(1)?,
                    high: row.get(2)?,
                    low: row.get(3)?,
                    close: row.get(4)?,
                    volume: row.get(5)?,
                })
            })
            .map_err(query_err)?;

        let bars = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_err)?;

        // primary key + ORDER BY already guarantee strict ordering
        PriceSeries::new(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, DashboardError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT symbol FROM price_bars ORDER BY symbol")
            .map_err(query_err)?;

        let rows = stmt.query_map([], |row| row.get(0)).map_err(query_err)?;
        rows.collect::<Result<Vec<String>, _>>().map_err(query_err)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DashboardError> {
        let conn = self.conn()?;

        let result: (Option<String>, Option<String>, i64) = conn
            .query_row(
                "SELECT MIN(date), MAX(date), COUNT(*) FROM price_bars WHERE symbol = ?1",
                params![symbol.to_uppercase()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(query_err)?;

        match result {
            (Some(min_str), Some(max_str), count) if count > 0 => Ok(Some((
                parse_stored_date(&min_str)?,
                parse_stored_date(&max_str)?,
                count as usize,
            ))),
            _ => Ok(None),
        }
    }
}
