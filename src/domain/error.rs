use thiserror::Error;

/// Failure to obtain a quote for one ticker.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status from a relay (rate limiting, access denied, ...).
    #[error("HTTP error {status} via {relay}")]
    HttpStatus { relay: String, status: u16 },

    #[error("Invalid data structure: {0}")]
    InvalidPayload(String),

    #[error("All relays failed for {0}")]
    AllRelaysExhausted(String),
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("No valid holdings found. Ensure CSV has \"Ticker\" and \"Weight\" columns.")]
    EmptyHoldings,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Io(e.to_string())
    }
}
