//! Runtime settings, read from `ETF_ATTRIBUTION_*` environment variables.

use crate::application::batch_fetch::{BatchConfig, DEFAULT_BATCH_DELAY, DEFAULT_BATCH_SIZE};
use crate::domain::error::DomainError;
use crate::domain::values::retry_policy::{RetryPolicy, DEFAULT_INITIAL_BACKOFF, DEFAULT_MAX_RETRIES};
use crate::infrastructure::quotes::chart::DEFAULT_CHART_BASE_URL;
use crate::infrastructure::quotes::relay::{default_relays, parse_relays, Relay};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_FUND_SYMBOL: &str = "FMTM";
pub const DEFAULT_HOLDINGS_PATH: &str = "holdings.csv";

pub const ENV_FUND: &str = "ETF_ATTRIBUTION_FUND";
pub const ENV_HOLDINGS: &str = "ETF_ATTRIBUTION_HOLDINGS";
pub const ENV_RELAYS: &str = "ETF_ATTRIBUTION_RELAYS";
pub const ENV_QUOTE_BASE_URL: &str = "ETF_ATTRIBUTION_QUOTE_BASE_URL";
pub const ENV_BATCH_SIZE: &str = "ETF_ATTRIBUTION_BATCH_SIZE";
pub const ENV_BATCH_DELAY_MS: &str = "ETF_ATTRIBUTION_BATCH_DELAY_MS";
pub const ENV_MAX_RETRIES: &str = "ETF_ATTRIBUTION_MAX_RETRIES";
pub const ENV_BACKOFF_MS: &str = "ETF_ATTRIBUTION_BACKOFF_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct AttributionConfig {
    pub fund_symbol: String,
    pub holdings_path: String,
    pub relays: Vec<Relay>,
    pub quote_base_url: String,
    pub batch: BatchConfig,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            fund_symbol: DEFAULT_FUND_SYMBOL.into(),
            holdings_path: DEFAULT_HOLDINGS_PATH.into(),
            relays: default_relays(),
            quote_base_url: DEFAULT_CHART_BASE_URL.into(),
            batch: BatchConfig::default(),
        }
    }
}

impl AttributionConfig {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let relays = match lookup(ENV_RELAYS) {
            Some(list) => parse_relays(&list).map_err(DomainError::InvalidInput)?,
            None => default_relays(),
        };

        let batch_size = parse_or(&lookup, ENV_BATCH_SIZE, DEFAULT_BATCH_SIZE)?;
        if batch_size == 0 {
            return Err(DomainError::InvalidInput(format!("{ENV_BATCH_SIZE} must be at least 1")));
        }

        let batch_delay_ms = parse_or(&lookup, ENV_BATCH_DELAY_MS, DEFAULT_BATCH_DELAY.as_millis() as u64)?;
        let max_retries = parse_or(&lookup, ENV_MAX_RETRIES, DEFAULT_MAX_RETRIES)?;
        let backoff_ms = parse_or(&lookup, ENV_BACKOFF_MS, DEFAULT_INITIAL_BACKOFF.as_millis() as u64)?;

        Ok(Self {
            fund_symbol: lookup(ENV_FUND)
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_FUND_SYMBOL.into()),
            holdings_path: lookup(ENV_HOLDINGS).unwrap_or_else(|| DEFAULT_HOLDINGS_PATH.into()),
            relays,
            quote_base_url: lookup(ENV_QUOTE_BASE_URL).unwrap_or_else(|| DEFAULT_CHART_BASE_URL.into()),
            batch: BatchConfig {
                batch_size,
                batch_delay: Duration::from_millis(batch_delay_ms),
                retry: RetryPolicy::new(max_retries, Duration::from_millis(backoff_ms)),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, DomainError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidInput(format!("{key}: not a valid number: {raw}"))),
    }
}
