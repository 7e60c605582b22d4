use crate::application::batch_fetch::BatchFetchUseCase;
use crate::domain::entities::holding::{EnrichedHolding, Holding};
use crate::domain::values::asset_class::is_stable;
use crate::domain::values::progress::FetchProgress;
use std::collections::HashSet;
use tokio::sync::mpsc::UnboundedSender;

/// Merges holdings with fetched quotes into per-holding contributions.
pub struct AttributionUseCase {
    batch: BatchFetchUseCase,
}

impl AttributionUseCase {
    pub fn new(batch: BatchFetchUseCase) -> Self {
        Self { batch }
    }

    /// Tradable tickers to quote, first occurrence order, duplicates removed.
    pub fn tickers_to_fetch(holdings: &[Holding]) -> Vec<String> {
        let mut seen = HashSet::new();
        holdings
            .iter()
            .map(|h| &h.ticker)
            .filter(|t| !t.is_empty() && !is_stable(t))
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect()
    }

    /// Build a fresh set of enriched holdings, in input order.
    ///
    /// Stable assets get a flat synthetic quote, tradable ones their fetched
    /// quote, and tickers that could not be fetched an error marker.
    pub async fn enrich(
        &self,
        holdings: &[Holding],
        progress: Option<&UnboundedSender<FetchProgress>>,
    ) -> Vec<EnrichedHolding> {
        let tickers = Self::tickers_to_fetch(holdings);
        let quotes = self.batch.execute(&tickers, progress).await;

        holdings
            .iter()
            .map(|h| {
                if is_stable(&h.ticker) {
                    return EnrichedHolding::stable(h.clone());
                }
                // Duplicate tickers share one quote.
                match quotes.get(&h.ticker).cloned().flatten() {
                    Some(quote) => EnrichedHolding::priced(h.clone(), quote),
                    None => EnrichedHolding::failed(h.clone()),
                }
            })
            .collect()
    }
}
