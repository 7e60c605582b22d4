use crate::domain::entities::market_data::MarketData;
use crate::domain::error::FetchError;
use crate::domain::ports::quote_source::QuoteSource;
use crate::domain::values::retry_policy::RetryPolicy;
use tracing::debug;

/// Fetch one quote, retrying failures with exponential backoff.
///
/// The error from the final attempt is returned unchanged.
pub async fn fetch_with_retry(
    source: &dyn QuoteSource,
    ticker: &str,
    policy: &RetryPolicy,
) -> Result<MarketData, FetchError> {
    let mut attempt = 0;
    loop {
        match source.fetch(ticker).await {
            Ok(quote) => return Ok(quote),
            Err(e) if attempt < policy.max_retries => {
                let backoff = policy.backoff(attempt);
                debug!(
                    ticker,
                    attempt = attempt + 1,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "Retrying quote fetch"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
