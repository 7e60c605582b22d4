use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Price used for cash-like positions that are never quoted.
pub const STABLE_PRICE: f64 = 1.0;

/// A single quote snapshot. One per holding per refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub previous_close: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl MarketData {
    /// Build a quote from the current price and the previous close, deriving
    /// the absolute and percentage change.
    pub fn from_prices(symbol: impl Into<String>, price: f64, previous_close: f64) -> Self {
        let change = price - previous_close;
        Self {
            symbol: symbol.into(),
            price,
            change,
            change_percent: change / previous_close * 100.0,
            previous_close,
            timestamp: Utc::now(),
        }
    }

    /// Synthetic flat quote for cash and money-market positions.
    pub fn stable(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: STABLE_PRICE,
            change: 0.0,
            change_percent: 0.0,
            previous_close: STABLE_PRICE,
            timestamp: Utc::now(),
        }
    }
}
