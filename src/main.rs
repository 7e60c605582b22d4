use clap::Parser;
use etf_attribution::cli::commands::{Cli, Commands};
use etf_attribution::config::AttributionConfig;
use etf_attribution::domain::values::progress::FetchProgress;
use etf_attribution::domain::values::sort::{sort_holdings, SortDirection, SortField};
use etf_attribution::EtfAttribution;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "etf_attribution=info";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match AttributionConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(config, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(
    mut config: AttributionConfig,
    cmd: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Holdings { csv } => {
            let app = EtfAttribution::with_config(config);
            let parsed = app.load_holdings(csv.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Commands::Quote { ticker } => {
            let app = EtfAttribution::with_config(config);
            let quote = app.quote(&ticker).await?;
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        Commands::Attribute {
            csv,
            fund,
            sort,
            asc,
            quiet,
        } => {
            let field: SortField = sort.parse().map_err(|e: String| e)?;
            let direction = if asc {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            };
            if let Some(fund) = fund {
                config.fund_symbol = fund.trim().to_uppercase();
            }

            let app = EtfAttribution::with_config(config);
            let parsed = app.load_holdings(csv.as_deref())?;

            let (tx, rx) = mpsc::unbounded_channel();
            let bar = (!quiet).then(progress_bar);
            let reporter = tokio::spawn(report_progress(rx, bar));

            let mut report = app.refresh(&parsed.holdings, Some(&tx)).await;
            drop(tx);
            reporter.await?;

            sort_holdings(&mut report.holdings, field, direction);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar().template("[{bar:40.cyan/blue}] {pos}/{len} {msg}") {
        pb.set_style(style.progress_chars("█▓░"));
    }
    pb.set_message("Fetching quotes...");
    pb
}

async fn report_progress(mut rx: mpsc::UnboundedReceiver<FetchProgress>, bar: Option<ProgressBar>) {
    while let Some(update) = rx.recv().await {
        if let Some(pb) = &bar {
            pb.set_length(update.total as u64);
            pb.set_position(update.completed as u64);
        }
    }
    if let Some(pb) = bar {
        pb.finish_with_message("done");
    }
}
