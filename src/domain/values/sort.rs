//! Ordering and ranking of enriched holdings for presentation consumers.

use crate::domain::entities::holding::EnrichedHolding;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort key used for holdings whose change or contribution is unknown.
const MISSING_SORT_VALUE: f64 = -999.0;

pub const DEFAULT_MOVERS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Ticker,
    Weight,
    Price,
    Change,
    Contribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortField::Ticker => write!(f, "ticker"),
            SortField::Weight => write!(f, "weight"),
            SortField::Price => write!(f, "price"),
            SortField::Change => write!(f, "change"),
            SortField::Contribution => write!(f, "contribution"),
        }
    }
}

impl FromStr for SortField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ticker" => Ok(SortField::Ticker),
            "weight" => Ok(SortField::Weight),
            "price" => Ok(SortField::Price),
            "change" => Ok(SortField::Change),
            "contribution" => Ok(SortField::Contribution),
            _ => Err(format!("Unknown sort field: {s}")),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("Unknown sort direction: {s}")),
        }
    }
}

fn numeric_key(h: &EnrichedHolding, field: SortField) -> f64 {
    match field {
        SortField::Weight => h.holding.weight,
        SortField::Price => h.market_data.as_ref().map_or(0.0, |md| md.price),
        SortField::Change => h
            .market_data
            .as_ref()
            .map_or(MISSING_SORT_VALUE, |md| md.change_percent),
        SortField::Contribution => h.contribution.unwrap_or(MISSING_SORT_VALUE),
        SortField::Ticker => 0.0,
    }
}

fn compare(a: &EnrichedHolding, b: &EnrichedHolding, field: SortField) -> Ordering {
    match field {
        SortField::Ticker => a.ticker().cmp(b.ticker()),
        _ => numeric_key(a, field)
            .partial_cmp(&numeric_key(b, field))
            .unwrap_or(Ordering::Equal),
    }
}

/// Stable sort in place. Unknown values sort as the lowest.
pub fn sort_holdings(holdings: &mut [EnrichedHolding], field: SortField, direction: SortDirection) {
    holdings.sort_by(|a, b| {
        let ord = compare(a, b, field);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

/// Largest positive contributions first.
pub fn top_contributors(holdings: &[EnrichedHolding], n: usize) -> Vec<&EnrichedHolding> {
    let mut winners: Vec<_> = holdings
        .iter()
        .filter(|h| h.contribution.unwrap_or(0.0) > 0.0)
        .collect();
    winners.sort_by(|a, b| compare(b, a, SortField::Contribution));
    winners.truncate(n);
    winners
}

/// Most negative contributions first.
pub fn top_detractors(holdings: &[EnrichedHolding], n: usize) -> Vec<&EnrichedHolding> {
    let mut losers: Vec<_> = holdings
        .iter()
        .filter(|h| h.contribution.unwrap_or(0.0) < 0.0)
        .collect();
    losers.sort_by(|a, b| compare(a, b, SortField::Contribution));
    losers.truncate(n);
    losers
}
