//! Shared test helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use etf_attribution::config::AttributionConfig;
use etf_attribution::domain::entities::market_data::MarketData;
use etf_attribution::domain::error::FetchError;
use etf_attribution::domain::ports::quote_source::QuoteSource;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub fn quote(symbol: &str, change_percent: f64) -> MarketData {
    MarketData {
        symbol: symbol.to_string(),
        price: 100.0 + change_percent,
        change: change_percent,
        change_percent,
        previous_close: 100.0,
        timestamp: Utc::now(),
    }
}

/// Quote source with canned answers per ticker. Unknown tickers fail.
#[derive(Default)]
pub struct ScriptedSource {
    quotes: HashMap<String, f64>,
    /// ticker -> number of failures before the canned quote is returned
    flaky: HashMap<String, usize>,
    failing: HashSet<String>,
    latency: Duration,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, ticker: &str, change_percent: f64) -> Self {
        self.quotes.insert(ticker.to_string(), change_percent);
        self
    }

    pub fn failing(mut self, ticker: &str) -> Self {
        self.failing.insert(ticker.to_string());
        self
    }

    pub fn flaky(mut self, ticker: &str, failures: usize, change_percent: f64) -> Self {
        self.flaky.insert(ticker.to_string(), failures);
        self.quotes.insert(ticker.to_string(), change_percent);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, ticker: &str) -> usize {
        self.calls().iter().filter(|t| *t == ticker).count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self, ticker: &str) -> Result<MarketData, FetchError> {
        let previous_calls = {
            let mut calls = self.calls.lock().unwrap();
            let n = calls.iter().filter(|t| *t == ticker).count();
            calls.push(ticker.to_string());
            n
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(ticker) {
            return Err(FetchError::HttpStatus {
                relay: "scripted".into(),
                status: 429,
            });
        }
        if let Some(failures) = self.flaky.get(ticker) {
            if previous_calls < *failures {
                return Err(FetchError::Network(format!("attempt {previous_calls} for {ticker}")));
            }
        }
        match self.quotes.get(ticker) {
            Some(cp) => Ok(quote(ticker, *cp)),
            None => Err(FetchError::AllRelaysExhausted(ticker.to_string())),
        }
    }
}

/// Defaults with retries and pauses short enough for real-time tests.
pub fn fast_config() -> AttributionConfig {
    let mut config = AttributionConfig::default();
    config.batch.batch_delay = Duration::from_millis(1);
    config.batch.retry.initial_backoff = Duration::from_millis(1);
    config
}

pub fn chart_body(symbol: &str, price: f64, previous_close: f64) -> String {
    serde_json::json!({
        "chart": {
            "result": [{
                "meta": {
                    "symbol": symbol,
                    "regularMarketPrice": price,
                    "chartPreviousClose": previous_close
                }
            }],
            "error": null
        }
    })
    .to_string()
}

/// Minimal HTTP/1.1 server on localhost. `handler` maps the request target
/// to a status and body. Returns the base URL (with trailing slash) and the
/// list of request targets seen so far.
pub async fn spawn_http_stub<F>(handler: F) -> (String, Arc<Mutex<Vec<String>>>)
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_server = seen.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let handler = handler.clone();
            let seen = seen_by_server.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = socket.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let request = String::from_utf8_lossy(&buf);
                let target = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                seen.lock().unwrap().push(target.clone());

                let (status, body) = handler(&target);
                let response = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{addr}/"), seen)
}
