use crate::domain::entities::holding::{EnrichedHolding, HoldingStatus};
use crate::domain::entities::market_data::MarketData;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Absolute tracking gap, in percentage points, above which the estimate is
/// considered out of line with the fund's reported move.
pub const GAP_WARNING_THRESHOLD: f64 = 0.5;

/// Fund-level view derived from the current enriched holdings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EtfSummary {
    pub symbol: String,
    pub market_data: Option<MarketData>,
    pub calculated_daily_performance: f64,
    /// `None` when the fund quote is unavailable ("gap unknown").
    pub tracking_gap: Option<f64>,
    pub holdings_count: usize,
    pub stable_count: usize,
    pub failed_count: usize,
    pub last_updated: DateTime<Utc>,
}

impl EtfSummary {
    pub fn compute(
        symbol: impl Into<String>,
        fund: Option<MarketData>,
        holdings: &[EnrichedHolding],
    ) -> Self {
        let calculated = calculated_daily_performance(holdings);
        let tracking_gap = fund
            .as_ref()
            .map(|md| tracking_gap(md.change_percent, calculated));

        Self {
            symbol: symbol.into(),
            market_data: fund,
            calculated_daily_performance: calculated,
            tracking_gap,
            holdings_count: holdings.len(),
            stable_count: holdings.iter().filter(|h| h.is_stable).count(),
            failed_count: holdings
                .iter()
                .filter(|h| h.status() == HoldingStatus::Failed)
                .count(),
            last_updated: Utc::now(),
        }
    }

    /// True when the gap is known and exceeds [`GAP_WARNING_THRESHOLD`].
    pub fn gap_flagged(&self) -> bool {
        self.tracking_gap
            .is_some_and(|gap| gap.abs() > GAP_WARNING_THRESHOLD)
    }
}

/// Sum of contributions; holdings without one count as zero.
pub fn calculated_daily_performance(holdings: &[EnrichedHolding]) -> f64 {
    holdings.iter().map(|h| h.contribution.unwrap_or(0.0)).sum()
}

pub fn tracking_gap(fund_change_percent: f64, calculated: f64) -> f64 {
    fund_change_percent - calculated
}
