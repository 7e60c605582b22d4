//! Passthrough relays in front of the quote source, tried in priority order.

use std::fmt;
use std::str::FromStr;

/// How a relay expects the target URL to be passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStyle {
    /// `{base}?{encoded target}`
    QueryParam,
    /// `{base}raw?url={encoded target}`
    RawUrl,
    /// No relay: the target URL is requested as is.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relay {
    pub name: String,
    pub base: String,
    pub style: RelayStyle,
}

impl Relay {
    pub fn new(name: impl Into<String>, base: impl Into<String>, style: RelayStyle) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
            style,
        }
    }

    /// corsproxy.io: fast and rarely rate limited.
    pub fn corsproxy() -> Self {
        Self::new("corsproxy", "https://corsproxy.io/", RelayStyle::QueryParam)
    }

    /// allorigins.win raw endpoint.
    pub fn allorigins() -> Self {
        Self::new("allorigins", "https://api.allorigins.win/", RelayStyle::RawUrl)
    }

    pub fn direct() -> Self {
        Self::new("direct", "", RelayStyle::Direct)
    }

    /// URL to request so that the relay forwards to `target`.
    pub fn wrap(&self, target: &str) -> String {
        match self.style {
            RelayStyle::QueryParam => format!("{}?{}", self.base, urlencoding::encode(target)),
            RelayStyle::RawUrl => format!("{}raw?url={}", self.base, urlencoding::encode(target)),
            RelayStyle::Direct => target.to_string(),
        }
    }
}

/// Primary relay first, then fallbacks.
pub fn default_relays() -> Vec<Relay> {
    vec![Relay::corsproxy(), Relay::allorigins()]
}

impl fmt::Display for Relay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl FromStr for Relay {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "corsproxy" => Ok(Relay::corsproxy()),
            "allorigins" => Ok(Relay::allorigins()),
            "direct" => Ok(Relay::direct()),
            _ => Err(format!("Unknown relay: {s}")),
        }
    }
}

/// Parse a comma-separated relay list, preserving order.
pub fn parse_relays(list: &str) -> Result<Vec<Relay>, String> {
    let relays = list
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<Relay>, String>>()?;
    if relays.is_empty() {
        return Err("Relay list is empty".into());
    }
    Ok(relays)
}
