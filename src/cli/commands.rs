use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "etf-attribution",
    about = "Estimated daily performance attribution for an ETF"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a holdings CSV and print the holdings
    Holdings {
        /// Holdings CSV (defaults to ETF_ATTRIBUTION_HOLDINGS or ./holdings.csv)
        csv: Option<PathBuf>,
    },
    /// Fetch a single quote
    Quote {
        /// Ticker, holdings-file syntax (e.g. BRK.B)
        ticker: String,
    },
    /// Fetch quotes for every holding and attribute the fund's daily move
    Attribute {
        /// Holdings CSV (defaults to ETF_ATTRIBUTION_HOLDINGS or ./holdings.csv)
        csv: Option<PathBuf>,
        /// Fund ticker to compare against
        #[arg(long)]
        fund: Option<String>,
        /// Sort holdings by ticker, weight, price, change or contribution
        #[arg(long, default_value = "contribution")]
        sort: String,
        /// Ascending order (default is descending)
        #[arg(long)]
        asc: bool,
        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },
}
