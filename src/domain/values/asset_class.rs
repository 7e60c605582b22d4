//! Stable (cash / money-market) vs tradable classification.

use serde::Serialize;
use std::fmt;

/// Tickers that are always treated as cash-equivalent.
const STABLE_TICKERS: &[&str] = &["FGXXX", "CASH&OTHER"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    /// Priced at a flat 1.00 with zero daily change; never quoted.
    Stable,
    Tradable,
}

impl AssetClass {
    pub fn from_ticker(ticker: &str) -> Self {
        let t = ticker.to_uppercase();

        if STABLE_TICKERS.contains(&t.as_str()) || t.contains("CASH") || t.contains('&') {
            return AssetClass::Stable;
        }

        AssetClass::Tradable
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetClass::Stable => write!(f, "stable"),
            AssetClass::Tradable => write!(f, "tradable"),
        }
    }
}

pub fn is_stable(ticker: &str) -> bool {
    AssetClass::from_ticker(ticker) == AssetClass::Stable
}
