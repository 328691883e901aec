//! Startup configuration for the dashboard.
//!
//! Built once from a [`ConfigPort`] and passed down explicitly; there is no
//! module-level default ticker or date range.

use crate::domain::error::DashboardError;
use crate::domain::symbol::normalize_symbol;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_SYMBOL: &str = "AAPL";
pub const DEFAULT_LOOKBACK_WEEKS: u32 = 4;
pub const DEFAULT_QUANTITY: f64 = 1.0;
pub const DEFAULT_MIN_QUANTITY: f64 = 1.0;
pub const DEFAULT_MAX_QUANTITY: f64 = 100.0;

const SECTION: &str = "dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Sqlite,
    Synthetic,
}

impl SourceKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "csv" => Some(SourceKind::Csv),
            "sqlite" => Some(SourceKind::Sqlite),
            "synthetic" => Some(SourceKind::Synthetic),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Csv => "csv",
            SourceKind::Sqlite => "sqlite",
            SourceKind::Synthetic => "synthetic",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub symbol: String,
    pub lookback_weeks: u32,
    pub default_quantity: f64,
    pub min_quantity: f64,
    pub max_quantity: f64,
    pub source: SourceKind,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            lookback_weeks: DEFAULT_LOOKBACK_WEEKS,
            default_quantity: DEFAULT_QUANTITY,
            min_quantity: DEFAULT_MIN_QUANTITY,
            max_quantity: DEFAULT_MAX_QUANTITY,
            source: SourceKind::Synthetic,
        }
    }
}

impl DashboardSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, DashboardError> {
        let symbol = match config.get_string(SECTION, "symbol") {
            Some(raw) => normalize_symbol(&raw).map_err(|e| invalid("symbol", &e.to_string()))?,
            None => DEFAULT_SYMBOL.to_string(),
        };

        let lookback = config.get_int(SECTION, "lookback_weeks", i64::from(DEFAULT_LOOKBACK_WEEKS));
        let lookback_weeks = u32::try_from(lookback)
            .ok()
            .filter(|w| *w >= 1)
            .ok_or_else(|| invalid("lookback_weeks", "lookback_weeks must be at least 1"))?;

        let min_quantity = config.get_double(SECTION, "min_quantity", DEFAULT_MIN_QUANTITY);
        let max_quantity = config.get_double(SECTION, "max_quantity", DEFAULT_MAX_QUANTITY);
        if !(min_quantity.is_finite() && min_quantity > 0.0) {
            return Err(invalid("min_quantity", "min_quantity must be positive"));
        }
        if !(max_quantity.is_finite() && max_quantity >= min_quantity) {
            return Err(invalid(
                "max_quantity",
                "max_quantity must not be less than min_quantity",
            ));
        }

        let default_quantity = config.get_double(SECTION, "quantity", DEFAULT_QUANTITY);
        if !(min_quantity..=max_quantity).contains(&default_quantity) {
            return Err(invalid(
                "quantity",
                &format!("quantity must be between {min_quantity} and {max_quantity}"),
            ));
        }

        let source = match config.get_string(SECTION, "source") {
            Some(raw) => SourceKind::parse(&raw)
                .ok_or_else(|| invalid("source", "source must be one of csv, sqlite, synthetic"))?,
            None => SourceKind::Synthetic,
        };

        Ok(Self {
            symbol,
            lookback_weeks,
            default_quantity,
            min_quantity,
            max_quantity,
            source,
        })
    }
}

fn invalid(key: &str, reason: &str) -> DashboardError {
    DashboardError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn settings(ini: &str) -> Result<DashboardSettings, DashboardError> {
        DashboardSettings::from_config(&FileConfigAdapter::from_string(ini).unwrap())
    }

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(settings("").unwrap(), DashboardSettings::default());
    }

    #[test]
    fn reads_all_keys() {
        let s = settings(
            "[dashboard]\nsymbol = msft\nlookback_weeks = 12\nquantity = 25\n\
             min_quantity = 5\nmax_quantity = 50\nsource = CSV\n",
        )
        .unwrap();
        assert_eq!(s.symbol, "MSFT");
        assert_eq!(s.lookback_weeks, 12);
        assert_eq!(s.default_quantity, 25.0);
        assert_eq!(s.min_quantity, 5.0);
        assert_eq!(s.max_quantity, 50.0);
        assert_eq!(s.source, SourceKind::Csv);
    }

    #[test]
    fn zero_lookback_rejected() {
        let err = settings("[dashboard]\nlookback_weeks = 0\n").unwrap_err();
        assert!(matches!(err, DashboardError::ConfigInvalid { key, .. } if key == "lookback_weeks"));
    }

    #[test]
    fn negative_lookback_rejected() {
        let err = settings("[dashboard]\nlookback_weeks = -2\n").unwrap_err();
        assert!(matches!(err, DashboardError::ConfigInvalid { key, .. } if key == "lookback_weeks"));
    }

    #[test]
    fn quantity_outside_bounds_rejected() {
        let err = settings("[dashboard]\nquantity = 500\n").unwrap_err();
        assert!(matches!(err, DashboardError::ConfigInvalid { key, .. } if key == "quantity"));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let err = settings("[dashboard]\nmin_quantity = 10\nmax_quantity = 2\nquantity = 5\n")
            .unwrap_err();
        assert!(matches!(err, DashboardError::ConfigInvalid { key, .. } if key == "max_quantity"));
    }

    #[test]
    fn path_like_symbol_rejected() {
        let err = settings("[dashboard]\nsymbol = ../secrets\n").unwrap_err();
        assert!(matches!(err, DashboardError::ConfigInvalid { key, .. } if key == "symbol"));
    }

    #[test]
    fn unknown_source_rejected() {
        let err = settings("[dashboard]\nsource = yahoo\n").unwrap_err();
        assert!(matches!(err, DashboardError::ConfigInvalid { key, .. } if key == "source"));
    }

    #[test]
    fn source_kind_round_trip() {
        for kind in [SourceKind::Csv, SourceKind::Sqlite, SourceKind::Synthetic] {
            assert_eq!(SourceKind::parse(kind.as_str()), Some(kind));
        }
    }
}
