//! Yahoo Finance v8 chart endpoint: URL building and response decoding.

use crate::domain::entities::market_data::MarketData;
use crate::domain::error::FetchError;

pub const DEFAULT_CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";

/// Adapt a holdings-file ticker to the quote source syntax (`BRK.B` -> `BRK-B`).
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.replace('.', "-")
}

/// One-day, daily-interval chart URL for an already normalized symbol.
pub fn chart_url(base_url: &str, symbol: &str) -> String {
    format!("{base_url}{symbol}?interval=1d&range=1d")
}

#[derive(Debug, serde::Deserialize)]
struct ChartResponse {
    chart: Option<ChartResult>,
}

#[derive(Debug, serde::Deserialize)]
struct ChartResult {
    #[serde(default)]
    result: Option<Vec<ChartData>>,
}

#[derive(Debug, serde::Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Option<ChartMeta>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    chart_previous_close: Option<f64>,
    #[serde(default)]
    previous_close: Option<f64>,
}

/// Decode a chart response body into a quote.
///
/// The body must carry `chart.result[0].meta` with a price and either
/// `chartPreviousClose` or `previousClose`; anything else is an invalid
/// payload so the caller can move on to the next relay.
pub fn decode_chart(ticker: &str, body: &[u8]) -> Result<MarketData, FetchError> {
    let data: ChartResponse = serde_json::from_slice(body)
        .map_err(|e| FetchError::InvalidPayload(format!("{ticker}: {e}")))?;

    let meta = data
        .chart
        .and_then(|c| c.result)
        .and_then(|r| r.into_iter().next())
        .and_then(|d| d.meta)
        .ok_or_else(|| FetchError::InvalidPayload(format!("no chart meta for {ticker}")))?;

    let price = meta
        .regular_market_price
        .filter(|p| p.is_finite())
        .ok_or_else(|| FetchError::InvalidPayload(format!("no price for {ticker}")))?;

    let previous_close = meta
        .chart_previous_close
        .filter(|p| *p != 0.0)
        .or(meta.previous_close)
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| FetchError::InvalidPayload(format!("no previous close for {ticker}")))?;

    let symbol = meta.symbol.unwrap_or_else(|| normalize_ticker(ticker));
    Ok(MarketData::from_prices(symbol, price, previous_close))
}
