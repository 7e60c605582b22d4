use approx::assert_relative_eq;
use etf_attribution::infrastructure::csv::holdings_parser::{
    parse_holdings, parse_holdings_with_report, ColumnMode, HeaderSource,
};

const FUND_EXPORT: &str = "\u{feff}Fund Holdings as of 01/31/2025\r\n\
Fund,FMTM\r\n\
\r\n\
Ticker,Security Name,Quantity,Market Value,Portfolio Weight\r\n\
aapl,Apple Inc,\"179,412\",\"$41,000,000.00\",4.07%\r\n\
MSFT,Microsoft Corp,\"90,100\",\"$38,000,000.00\",3.80\r\n\
BRK.B,\"Berkshire Hathaway, Class B\",\"10,000\",\"$4,500,000.00\",0.45%\r\n\
\r\n\
FGXXX,First American Government Obligations,\"1,000,000\",\"$1,000,000.00\",1.00%\r\n";

#[test]
fn test_parses_fund_export_in_order() {
    let parsed = parse_holdings_with_report(FUND_EXPORT);
    let tickers: Vec<_> = parsed.holdings.iter().map(|h| h.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["AAPL", "MSFT", "BRK.B", "FGXXX"]);
    assert_eq!(parsed.report.header, HeaderSource::Detected(3));
    assert!(!parsed.report.is_ambiguous());
    assert_eq!(parsed.report.skipped_rows, 0);
}

#[test]
fn test_percent_and_bare_weights_match() {
    let holdings = parse_holdings("Ticker,Weight\nA,4.07%\nB,4.07\n");
    assert_eq!(holdings.len(), 2);
    assert_relative_eq!(holdings[0].weight, 4.07);
    assert_relative_eq!(holdings[1].weight, holdings[0].weight);
}

#[test]
fn test_quoted_commas_stay_in_one_column() {
    let holdings = parse_holdings(FUND_EXPORT);
    let brk = &holdings[2];
    assert_eq!(brk.name, "Berkshire Hathaway, Class B");
    assert_relative_eq!(brk.weight, 0.45);
    assert_eq!(holdings[0].shares, Some(179_412.0));
}

#[test]
fn test_name_column_optional() {
    let holdings = parse_holdings("Ticker,Weight\nNVDA,5.5%\n");
    assert_eq!(holdings[0].name, "Unknown");
}

#[test]
fn test_rows_missing_ticker_or_weight_are_skipped() {
    let parsed = parse_holdings_with_report("Ticker,Name,Weight\n,Nameless,1%\nAMZN,Amazon,\nGOOG,Alphabet,2%\n");
    assert_eq!(parsed.holdings.len(), 1);
    assert_eq!(parsed.holdings[0].ticker, "GOOG");
    assert_eq!(parsed.report.skipped_rows, 2);
}

#[test]
fn test_unparsable_weight_defaults_to_zero() {
    let holdings = parse_holdings("Ticker,Weight\nXYZ,n/a\n");
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].weight, 0.0);
}

#[test]
fn test_duplicate_tickers_are_kept() {
    let holdings = parse_holdings("Ticker,Weight\nAAPL,1%\nAAPL,2%\n");
    assert_eq!(holdings.len(), 2);
}

#[test]
fn test_positional_fallback_without_header() {
    let parsed = parse_holdings_with_report("some preamble\nTSLA,Tesla Inc,1000,2.5%\nAMD,,AMD Inc,1.25\n");
    assert_eq!(parsed.report.header, HeaderSource::AssumedFirstLine);
    assert_eq!(parsed.report.columns, ColumnMode::Positional);
    assert!(parsed.report.is_ambiguous());

    let h = &parsed.holdings;
    assert_eq!(h.len(), 2);
    assert_eq!(h[0].ticker, "TSLA");
    assert_eq!(h[0].name, "Tesla Inc");
    // "1000" is the first percentage-looking field
    assert_relative_eq!(h[0].weight, 1000.0);
    assert_eq!(h[1].name, "AMD Inc");
    assert_relative_eq!(h[1].weight, 1.25);
}

#[test]
fn test_empty_input_yields_empty_list() {
    assert!(parse_holdings("").is_empty());
    assert!(parse_holdings("\u{feff}  \r\n ").is_empty());
}

#[test]
fn test_header_only_yields_empty_list() {
    assert!(parse_holdings("Ticker,Weight\n").is_empty());
}

#[test]
fn test_spaced_delimiters_keep_quoted_name_together() {
    let holdings = parse_holdings("Ticker, Name, Weight\nAAPL, \"Apple, Inc\", 4.07%\n");
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].name, "Apple, Inc");
    assert_relative_eq!(holdings[0].weight, 4.07);
}

#[test]
fn test_spaced_delimiters_keep_quoted_shares_together() {
    let parsed = parse_holdings_with_report("Ticker, Name, Shares, Weight\nAAPL, \"Apple, Inc\", \"179,412\", 4.07%\n");
    assert_eq!(
        parsed.report.columns,
        ColumnMode::Named {
            ticker: 0,
            weight: 3,
            name: Some(1),
            shares: Some(2),
        }
    );
    let aapl = &parsed.holdings[0];
    assert_eq!(aapl.ticker, "AAPL");
    assert_eq!(aapl.name, "Apple, Inc");
    assert_eq!(aapl.shares, Some(179_412.0));
    assert_relative_eq!(aapl.weight, 4.07);
}
