use crate::domain::entities::market_data::MarketData;
use serde::{Deserialize, Serialize};

/// Error text attached to holdings whose quote could not be obtained.
pub const FETCH_FAILED: &str = "Failed to fetch";

/// One line item of the fund. `weight` is in percentage points (4.07 = 4.07%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    pub name: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<f64>,
}

impl Holding {
    pub fn new(ticker: impl AsRef<str>, name: impl Into<String>, weight: f64) -> Self {
        Self {
            ticker: ticker.as_ref().to_uppercase(),
            name: name.into(),
            weight,
            shares: None,
        }
    }
}

/// Estimated share of the fund's daily move, in percentage points.
pub fn contribution(weight: f64, change_percent: f64) -> f64 {
    weight / 100.0 * change_percent
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldingStatus {
    Pending,
    Priced,
    Stable,
    Failed,
}

/// A holding merged with the outcome of one refresh cycle.
///
/// Outside of the pending state exactly one of `market_data` / `error` is set.
/// Instances are rebuilt on every refresh, never patched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedHolding {
    #[serde(flatten)]
    pub holding: Holding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_data: Option<MarketData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contribution: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub is_stable: bool,
}

impl EnrichedHolding {
    /// Placeholder shown while quotes are still loading.
    pub fn pending(holding: Holding) -> Self {
        Self {
            holding,
            market_data: None,
            contribution: None,
            error: None,
            is_stable: false,
        }
    }

    pub fn stable(holding: Holding) -> Self {
        let market_data = MarketData::stable(holding.ticker.clone());
        Self {
            holding,
            market_data: Some(market_data),
            contribution: Some(0.0),
            error: None,
            is_stable: true,
        }
    }

    pub fn priced(holding: Holding, market_data: MarketData) -> Self {
        let contribution = contribution(holding.weight, market_data.change_percent);
        Self {
            holding,
            market_data: Some(market_data),
            contribution: Some(contribution),
            error: None,
            is_stable: false,
        }
    }

    pub fn failed(holding: Holding) -> Self {
        Self {
            holding,
            market_data: None,
            contribution: None,
            error: Some(FETCH_FAILED.to_string()),
            is_stable: false,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.holding.ticker
    }

    pub fn status(&self) -> HoldingStatus {
        match (&self.market_data, &self.error) {
            (_, Some(_)) => HoldingStatus::Failed,
            (Some(_), None) if self.is_stable => HoldingStatus::Stable,
            (Some(_), None) => HoldingStatus::Priced,
            (None, None) => HoldingStatus::Pending,
        }
    }
}
