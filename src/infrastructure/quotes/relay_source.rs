use super::chart::{chart_url, decode_chart, normalize_ticker, DEFAULT_CHART_BASE_URL};
use super::relay::{default_relays, Relay};
use crate::domain::entities::market_data::MarketData;
use crate::domain::error::FetchError;
use crate::domain::ports::quote_source::QuoteSource;
use async_trait::async_trait;
use tracing::debug;

/// Chart quotes fetched through an ordered list of relays. The first relay
/// returning a structurally valid chart wins; later relays are not tried.
pub struct RelayQuoteSource {
    relays: Vec<Relay>,
    chart_base_url: String,
    client: reqwest::Client,
}

impl RelayQuoteSource {
    pub fn new(relays: Vec<Relay>, chart_base_url: impl Into<String>) -> Self {
        Self {
            relays,
            chart_base_url: chart_base_url.into(),
            client: reqwest::Client::builder()
                .user_agent(
                    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                     AppleWebKit/537.36 (KHTML, like Gecko) \
                     Chrome/120.0.0.0 Safari/537.36",
                )
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn relays(&self) -> &[Relay] {
        &self.relays
    }

    async fn fetch_via(&self, relay: &Relay, ticker: &str, target: &str) -> Result<MarketData, FetchError> {
        let resp = self
            .client
            .get(relay.wrap(target))
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("{relay}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                relay: relay.name.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Network(format!("{relay}: {e}")))?;

        decode_chart(ticker, &body)
    }
}

impl Default for RelayQuoteSource {
    fn default() -> Self {
        Self::new(default_relays(), DEFAULT_CHART_BASE_URL)
    }
}

#[async_trait]
impl QuoteSource for RelayQuoteSource {
    fn name(&self) -> &str {
        "yahoo_chart"
    }

    async fn fetch(&self, ticker: &str) -> Result<MarketData, FetchError> {
        let target = chart_url(&self.chart_base_url, &normalize_ticker(ticker));
        let mut last_error = None;

        for relay in &self.relays {
            match self.fetch_via(relay, ticker, &target).await {
                Ok(quote) => return Ok(quote),
                Err(e) => {
                    debug!(%relay, ticker, error = %e, "Relay failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::AllRelaysExhausted(ticker.to_string())))
    }
}
