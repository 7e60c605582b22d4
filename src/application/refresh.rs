use crate::application::attribution::AttributionUseCase;
use crate::domain::entities::holding::{EnrichedHolding, Holding};
use crate::domain::entities::market_data::MarketData;
use crate::domain::entities::summary::EtfSummary;
use crate::domain::ports::quote_source::QuoteSource;
use crate::domain::values::progress::FetchProgress;
use crate::domain::values::sort::{top_contributors, top_detractors, DEFAULT_MOVERS};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// Outcome of one refresh cycle, ready for presentation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionReport {
    pub summary: EtfSummary,
    pub holdings: Vec<EnrichedHolding>,
    pub top_contributors: Vec<EnrichedHolding>,
    pub top_detractors: Vec<EnrichedHolding>,
}

impl AttributionReport {
    pub fn new(summary: EtfSummary, holdings: Vec<EnrichedHolding>) -> Self {
        let top_contributors = top_contributors(&holdings, DEFAULT_MOVERS)
            .into_iter()
            .cloned()
            .collect();
        let top_detractors = top_detractors(&holdings, DEFAULT_MOVERS)
            .into_iter()
            .cloned()
            .collect();
        Self {
            summary,
            holdings,
            top_contributors,
            top_detractors,
        }
    }
}

/// Fund quote plus holdings enrichment, summarized.
pub struct RefreshUseCase {
    source: Arc<dyn QuoteSource>,
    attribution: AttributionUseCase,
    fund_symbol: String,
}

impl RefreshUseCase {
    pub fn new(source: Arc<dyn QuoteSource>, attribution: AttributionUseCase, fund_symbol: String) -> Self {
        Self {
            source,
            attribution,
            fund_symbol,
        }
    }

    /// Fund-level quote, or `None` when it cannot be obtained.
    pub async fn fund_quote(&self) -> Option<MarketData> {
        match self.source.fetch(&self.fund_symbol).await {
            Ok(quote) => Some(quote),
            Err(e) => {
                warn!(fund = %self.fund_symbol, error = %e, "Fund quote unavailable, tracking gap unknown");
                None
            }
        }
    }

    pub async fn execute(
        &self,
        holdings: &[Holding],
        progress: Option<&UnboundedSender<FetchProgress>>,
    ) -> AttributionReport {
        let (fund, enriched) = tokio::join!(
            self.fund_quote(),
            self.attribution.enrich(holdings, progress)
        );

        let summary = EtfSummary::compute(self.fund_symbol.clone(), fund, &enriched);
        info!(
            fund = %summary.symbol,
            calculated = summary.calculated_daily_performance,
            gap = ?summary.tracking_gap,
            failed = summary.failed_count,
            "Attribution refreshed"
        );

        AttributionReport::new(summary, enriched)
    }
}
