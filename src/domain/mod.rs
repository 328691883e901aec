//! Core domain types and logic.

pub mod ohlcv;
pub mod metrics;
pub mod date_range;
pub mod settings;
pub mod symbol;
pub mod dashboard;
pub mod error;
