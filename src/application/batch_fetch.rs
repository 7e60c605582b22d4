use crate::application::retry::fetch_with_retry;
use crate::domain::entities::market_data::MarketData;
use crate::domain::ports::quote_source::QuoteSource;
use crate::domain::values::progress::FetchProgress;
use crate::domain::values::retry_policy::RetryPolicy;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(1200);

/// Shape of a batch run: group size, pause between groups, per-ticker retry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchConfig {
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub retry: RetryPolicy,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            retry: RetryPolicy::default(),
        }
    }
}

/// Quote results keyed by ticker; `None` marks a ticker that failed after
/// all retries.
pub type QuoteMap = HashMap<String, Option<MarketData>>;

pub struct BatchFetchUseCase {
    source: Arc<dyn QuoteSource>,
    config: BatchConfig,
}

impl BatchFetchUseCase {
    pub fn new(source: Arc<dyn QuoteSource>, config: BatchConfig) -> Self {
        Self { source, config }
    }

    /// Fetch every ticker in consecutive groups.
    ///
    /// Members of a group run concurrently; groups run one after another
    /// with `batch_delay` in between. One progress update is sent per
    /// group. Never fails: each input ticker ends up in the map.
    pub async fn execute(
        &self,
        tickers: &[String],
        progress: Option<&UnboundedSender<FetchProgress>>,
    ) -> QuoteMap {
        let total = tickers.len();
        let groups: Vec<&[String]> = tickers.chunks(self.config.batch_size.max(1)).collect();
        let mut results = QuoteMap::with_capacity(total);
        let mut completed = 0;

        for (i, group) in groups.iter().enumerate() {
            let fetches = group.iter().map(|ticker| async move {
                let quote = fetch_with_retry(self.source.as_ref(), ticker, &self.config.retry)
                    .await
                    .map_err(|e| warn!(ticker = ticker.as_str(), error = %e, "Failed to fetch quote"))
                    .ok();
                (ticker.clone(), quote)
            });

            results.extend(join_all(fetches).await);

            completed += group.len();
            let update = FetchProgress::new(completed, total);
            info!(completed = update.completed, total, "Quote batch settled");
            if let Some(tx) = progress {
                let _ = tx.send(update);
            }

            if i + 1 < groups.len() {
                tokio::time::sleep(self.config.batch_delay).await;
            }
        }

        results
    }
}
