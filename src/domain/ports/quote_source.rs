use crate::domain::entities::market_data::MarketData;
use crate::domain::error::FetchError;
use async_trait::async_trait;

/// Anything that can produce a current quote for a single ticker.
///
/// Implementations are shared across the concurrent requests of one batch
/// group, so they must be `Send + Sync` and hold no per-request state.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Source name for logging
    fn name(&self) -> &str;

    /// Fetch the latest quote. `ticker` uses the holdings file convention
    /// (e.g. `BRK.B`); implementations adapt it to their own syntax.
    async fn fetch(&self, ticker: &str) -> Result<MarketData, FetchError>;
}
