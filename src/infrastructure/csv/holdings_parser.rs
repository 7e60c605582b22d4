//! Holdings CSV parsing.
//!
//! Fund holdings exports are loosely structured: a few preamble lines, a
//! header somewhere near the top, quoted numbers with thousands separators,
//! and weights written either as `4.07%` or `4.07`. Parsing never fails; the
//! worst case is an empty list, and [`ParseReport`] records how the header
//! and columns were resolved.

use crate::domain::entities::holding::Holding;
use serde::Serialize;
use tracing::{debug, warn};

/// Only this many leading lines are searched for a header.
const HEADER_SCAN_LINES: usize = 20;

/// A header line must contain this marker...
const HEADER_TICKER_MARKER: &str = "ticker";
/// ...and at least one of these.
const HEADER_WEIGHT_MARKERS: &[&str] = &["weight", "portfolio weight"];

const NAME_COLUMNS: &[&str] = &["description", "name", "security name"];
const SHARES_COLUMNS: &[&str] = &["shares", "quantity"];

const UNKNOWN_NAME: &str = "Unknown";

/// Where the header row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "line")]
pub enum HeaderSource {
    /// A line carrying the ticker and weight markers.
    Detected(usize),
    /// Nothing matched; line 0 was taken as the header.
    AssumedFirstLine,
}

/// How data rows are mapped to holdings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnMode {
    Named {
        ticker: usize,
        weight: usize,
        name: Option<usize>,
        shares: Option<usize>,
    },
    /// Ticker in field 0, name in field 1 or 2, weight is the first
    /// percentage-looking field.
    Positional,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseReport {
    pub header: HeaderSource,
    pub columns: ColumnMode,
    /// Non-blank data rows dropped for a missing ticker or weight.
    pub skipped_rows: usize,
}

impl ParseReport {
    /// True when either the header or the columns had to be guessed.
    pub fn is_ambiguous(&self) -> bool {
        self.header == HeaderSource::AssumedFirstLine || self.columns == ColumnMode::Positional
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedHoldings {
    pub holdings: Vec<Holding>,
    pub report: ParseReport,
}

/// Header location strategies, tried in order until one matches.
#[derive(Debug, Clone, Copy)]
enum HeaderRule {
    Markers,
    FirstLine,
}

const HEADER_RULES: [HeaderRule; 2] = [HeaderRule::Markers, HeaderRule::FirstLine];

impl HeaderRule {
    fn locate(self, lines: &[&str]) -> Option<HeaderSource> {
        match self {
            HeaderRule::Markers => lines
                .iter()
                .take(HEADER_SCAN_LINES)
                .position(|l| is_header_line(l))
                .map(HeaderSource::Detected),
            HeaderRule::FirstLine => Some(HeaderSource::AssumedFirstLine),
        }
    }
}

fn is_header_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains(HEADER_TICKER_MARKER) && HEADER_WEIGHT_MARKERS.iter().any(|m| lower.contains(m))
}

fn locate_header(lines: &[&str]) -> HeaderSource {
    HEADER_RULES
        .iter()
        .find_map(|rule| rule.locate(lines))
        .unwrap_or(HeaderSource::AssumedFirstLine)
}

fn resolve_columns(header_line: &str) -> ColumnMode {
    let headers: Vec<String> = split_row(header_line)
        .into_iter()
        .map(|h| h.to_lowercase().replace(['"', '\''], "").trim().to_string())
        .collect();

    let ticker = headers.iter().position(|h| h == "ticker");
    let weight = headers.iter().position(|h| h.contains("weight"));
    let name = headers
        .iter()
        .position(|h| NAME_COLUMNS.contains(&h.as_str()));
    let shares = headers
        .iter()
        .position(|h| SHARES_COLUMNS.contains(&h.as_str()));

    match (ticker, weight) {
        (Some(ticker), Some(weight)) => ColumnMode::Named {
            ticker,
            weight,
            name,
            shares,
        },
        _ => ColumnMode::Positional,
    }
}

/// Drop whitespace around commas that sit outside double quotes.
///
/// The csv reader only honours a quote as the first byte of a field, so
/// `AAPL, "Apple, Inc"` would otherwise split inside the name. A comma is
/// quoted when an odd number of `"` precede it.
fn tighten_delimiters(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_quotes = false;
    let mut after_comma = false;

    for c in line.trim().chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if c == ',' {
                let kept = out.trim_end().len();
                out.truncate(kept);
                out.push(c);
                after_comma = true;
                continue;
            }
            if after_comma && c.is_whitespace() {
                continue;
            }
        }
        after_comma = false;
        out.push(c);
    }
    out
}

/// Split one line on commas outside double quotes, then strip surrounding
/// quotes and whitespace from every field.
fn split_row(line: &str) -> Vec<String> {
    let line = tighten_delimiters(line);
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(clean_field).collect(),
        Some(Err(e)) => {
            debug!("Falling back to plain split for malformed row: {e}");
            line.split(',').map(clean_field).collect()
        }
        None => Vec::new(),
    }
}

fn clean_field(field: &str) -> String {
    let trimmed = field.trim();
    let unquoted = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let unquoted = unquoted.strip_suffix('"').unwrap_or(unquoted);
    unquoted.trim().to_string()
}

/// `4.07%`, `4.07`, `-1`, `12`.
fn looks_like_weight(field: &str) -> bool {
    if field.contains('%') {
        return true;
    }
    let digits = field.strip_prefix('-').unwrap_or(field);
    let (int, frac) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    all_digits(int) && frac.map_or(true, all_digits)
}

/// Parse a weight in percentage points. Uses the longest leading numeric
/// prefix; anything unparsable is 0.
pub fn parse_weight(raw: &str) -> f64 {
    let s = raw.replacen('%', "", 1);
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .map_or(s.len(), |(i, _)| i);

    (1..=end)
        .rev()
        .filter_map(|n| s.get(..n)?.parse::<f64>().ok())
        .find(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn parse_shares(raw: &str) -> Option<f64> {
    raw.replace(',', "").trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_empty(field: Option<&String>) -> Option<&str> {
    field.map(String::as_str).filter(|s| !s.is_empty())
}

/// Resolve (ticker, name, weight, shares) from one split row.
fn extract<'a>(row: &'a [String], columns: ColumnMode) -> Option<(&'a str, &'a str, &'a str, Option<f64>)> {
    match columns {
        ColumnMode::Named {
            ticker,
            weight,
            name,
            shares,
        } => {
            let ticker = non_empty(row.get(ticker))?;
            let weight = non_empty(row.get(weight))?;
            let name = match name {
                Some(i) => row.get(i).map_or("", String::as_str),
                None => UNKNOWN_NAME,
            };
            let shares = shares.and_then(|i| row.get(i)).and_then(|s| parse_shares(s));
            Some((ticker, name, weight, shares))
        }
        ColumnMode::Positional => {
            let ticker = non_empty(row.first())?;
            let name = non_empty(row.get(1))
                .or_else(|| non_empty(row.get(2)))
                .unwrap_or(UNKNOWN_NAME);
            let weight = row.iter().map(String::as_str).find(|c| looks_like_weight(c))?;
            Some((ticker, name, weight, None))
        }
    }
}

/// Parse holdings and describe how the file was interpreted.
pub fn parse_holdings_with_report(text: &str) -> ParsedHoldings {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text).trim();
    let lines: Vec<&str> = text.lines().collect();

    let header = locate_header(&lines);
    let header_index = match header {
        HeaderSource::Detected(i) => i,
        HeaderSource::AssumedFirstLine => {
            warn!("Could not find a ticker/weight header, treating the first line as header");
            0
        }
    };
    let columns = lines
        .get(header_index)
        .map_or(ColumnMode::Positional, |l| resolve_columns(l));

    let mut holdings = Vec::new();
    let mut skipped_rows = 0;

    for (offset, line) in lines.iter().enumerate().skip(header_index + 1) {
        if line.trim().is_empty() {
            continue;
        }
        let row = split_row(line);
        match extract(&row, columns) {
            Some((ticker, name, weight, shares)) => {
                let mut holding = Holding::new(ticker, name, parse_weight(weight));
                holding.shares = shares;
                holdings.push(holding);
            }
            None => {
                debug!(line = offset, "Skipping row without ticker or weight");
                skipped_rows += 1;
            }
        }
    }

    ParsedHoldings {
        holdings,
        report: ParseReport {
            header,
            columns,
            skipped_rows,
        },
    }
}

/// Parse holdings from CSV text. Never fails; callers check for emptiness.
pub fn parse_holdings(text: &str) -> Vec<Holding> {
    parse_holdings_with_report(text).holdings
}
