//! Ticker symbol validation.
//!
//! Symbols end up in file names and request paths, so they are checked once
//! at every entry point (config, CLI flags, web query) before any data port
//! sees them.

use crate::domain::error::DashboardError;

pub const MAX_SYMBOL_LEN: usize = 16;

fn allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '-')
}

/// Trims and uppercases `raw`, rejecting anything outside `[A-Za-z0-9.^-]`.
pub fn normalize_symbol(raw: &str) -> Result<String, DashboardError> {
    let symbol = raw.trim();
    let valid = !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LEN
        && symbol.chars().all(allowed)
        && symbol.chars().any(|c| c.is_ascii_alphanumeric());
    if !valid {
        return Err(DashboardError::InvalidSymbol {
            symbol: raw.to_string(),
        });
    }
    Ok(symbol.to_ascii_uppercase())
}
