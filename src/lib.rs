pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::attribution::AttributionUseCase;
use crate::application::batch_fetch::BatchFetchUseCase;
use crate::application::refresh::{AttributionReport, RefreshUseCase};
use crate::application::retry::fetch_with_retry;
use crate::config::AttributionConfig;
use crate::domain::entities::holding::Holding;
use crate::domain::entities::market_data::MarketData;
use crate::domain::error::DomainError;
use crate::domain::ports::quote_source::QuoteSource;
use crate::domain::values::progress::FetchProgress;
use crate::infrastructure::csv::holdings_parser::{parse_holdings_with_report, ParsedHoldings};
use crate::infrastructure::quotes::relay_source::RelayQuoteSource;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

pub struct EtfAttribution {
    config: AttributionConfig,
    source: Arc<dyn QuoteSource>,
    refresh_uc: RefreshUseCase,
}

impl EtfAttribution {
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self::with_config(AttributionConfig::from_env()?))
    }

    pub fn with_config(config: AttributionConfig) -> Self {
        let source: Arc<dyn QuoteSource> = Arc::new(RelayQuoteSource::new(
            config.relays.clone(),
            config.quote_base_url.clone(),
        ));
        Self::with_source(config, source)
    }

    pub fn with_source(config: AttributionConfig, source: Arc<dyn QuoteSource>) -> Self {
        let batch_uc = BatchFetchUseCase::new(source.clone(), config.batch);
        let refresh_uc = RefreshUseCase::new(
            source.clone(),
            AttributionUseCase::new(batch_uc),
            config.fund_symbol.clone(),
        );
        Self {
            config,
            source,
            refresh_uc,
        }
    }

    pub fn config(&self) -> &AttributionConfig {
        &self.config
    }

    /// Parse CSV text, reporting an empty result as [`DomainError::EmptyHoldings`].
    pub fn parse_holdings(&self, text: &str) -> Result<ParsedHoldings, DomainError> {
        let parsed = parse_holdings_with_report(text);
        if parsed.holdings.is_empty() {
            return Err(DomainError::EmptyHoldings);
        }
        Ok(parsed)
    }

    /// Read and parse a holdings file; defaults to the configured path.
    pub fn load_holdings(&self, path: Option<&Path>) -> Result<ParsedHoldings, DomainError> {
        let path = path.unwrap_or_else(|| Path::new(&self.config.holdings_path));
        let text = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Io(format!("{}: {e}", path.display())))?;
        self.parse_holdings(&text)
    }

    /// Single quote with the configured retry policy.
    pub async fn quote(&self, ticker: &str) -> Result<MarketData, DomainError> {
        let ticker = ticker.trim().to_uppercase();
        Ok(fetch_with_retry(self.source.as_ref(), &ticker, &self.config.batch.retry).await?)
    }

    pub async fn refresh(
        &self,
        holdings: &[Holding],
        progress: Option<&UnboundedSender<FetchProgress>>,
    ) -> AttributionReport {
        self.refresh_uc.execute(holdings, progress).await
    }
}
