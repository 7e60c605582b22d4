mod common;

use approx::assert_relative_eq;
use common::ScriptedSource;
use etf_attribution::application::attribution::AttributionUseCase;
use etf_attribution::application::batch_fetch::{BatchConfig, BatchFetchUseCase};
use etf_attribution::domain::entities::holding::{Holding, HoldingStatus, FETCH_FAILED};
use etf_attribution::domain::entities::summary::calculated_daily_performance;
use etf_attribution::domain::values::progress::FetchProgress;
use std::sync::Arc;
use tokio::sync::mpsc;

fn attribution(source: Arc<ScriptedSource>) -> AttributionUseCase {
    AttributionUseCase::new(BatchFetchUseCase::new(source, BatchConfig::default()))
}

#[tokio::test(start_paused = true)]
async fn test_contribution_is_weight_fraction_times_move() {
    let source = Arc::new(ScriptedSource::new().with_quote("AAPL", 2.0));
    let uc = attribution(source);

    let enriched = uc.enrich(&[Holding::new("AAPL", "Apple", 10.0)], None).await;

    assert_relative_eq!(enriched[0].contribution.unwrap(), 0.2);
    assert_eq!(enriched[0].status(), HoldingStatus::Priced);
}

#[tokio::test(start_paused = true)]
async fn test_merge_policy_per_holding() {
    let source = Arc::new(
        ScriptedSource::new()
            .with_quote("NVDA", 3.0)
            .failing("BAD"),
    );
    let uc = attribution(source.clone());
    let holdings = vec![
        Holding::new("NVDA", "Nvidia", 50.0),
        Holding::new("FGXXX", "Money Market", 5.0),
        Holding::new("BAD", "Delisted", 10.0),
        Holding::new("Cash&Other", "Cash", 1.0),
    ];

    let enriched = uc.enrich(&holdings, None).await;

    let tickers: Vec<_> = enriched.iter().map(|h| h.ticker()).collect();
    assert_eq!(tickers, vec!["NVDA", "FGXXX", "BAD", "CASH&OTHER"]);

    assert_relative_eq!(enriched[0].contribution.unwrap(), 1.5);

    let mmf = &enriched[1];
    assert!(mmf.is_stable);
    assert_eq!(mmf.contribution, Some(0.0));
    assert_eq!(mmf.market_data.as_ref().unwrap().price, 1.0);
    assert!(mmf.error.is_none());

    let bad = &enriched[2];
    assert!(bad.market_data.is_none());
    assert!(bad.contribution.is_none());
    assert_eq!(bad.error.as_deref(), Some(FETCH_FAILED));

    assert_eq!(enriched[3].status(), HoldingStatus::Stable);

    // Stable assets are never sent to the quote source
    assert_eq!(source.calls_for("FGXXX"), 0);
    assert_eq!(source.calls_for("CASH&OTHER"), 0);

    assert_relative_eq!(calculated_daily_performance(&enriched), 1.5);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_tickers_fetched_once_counted_twice() {
    let source = Arc::new(ScriptedSource::new().with_quote("AAPL", 1.0));
    let uc = attribution(source.clone());
    let holdings = vec![
        Holding::new("AAPL", "Apple", 10.0),
        Holding::new("AAPL", "Apple (dup)", 20.0),
    ];

    let enriched = uc.enrich(&holdings, None).await;

    assert_eq!(source.calls_for("AAPL"), 1);
    assert_relative_eq!(enriched[0].contribution.unwrap(), 0.1);
    assert_relative_eq!(enriched[1].contribution.unwrap(), 0.2);
    assert_relative_eq!(calculated_daily_performance(&enriched), 0.3, epsilon = 1e-12);
}

#[tokio::test(start_paused = true)]
async fn test_progress_covers_tradable_tickers_only() {
    let source = Arc::new(ScriptedSource::new().with_quote("A", 0.0).with_quote("B", 0.0));
    let uc = attribution(source);
    let holdings = vec![
        Holding::new("A", "A", 1.0),
        Holding::new("FGXXX", "MMF", 1.0),
        Holding::new("B", "B", 1.0),
    ];
    let (tx, mut rx) = mpsc::unbounded_channel();

    uc.enrich(&holdings, Some(&tx)).await;

    assert_eq!(rx.try_recv().unwrap(), FetchProgress::new(2, 2));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_tickers_to_fetch() {
    let holdings = vec![
        Holding::new("MSFT", "", 1.0),
        Holding::new("FGXXX", "", 1.0),
        Holding::new("AAPL", "", 1.0),
        Holding::new("MSFT", "", 1.0),
        Holding::new("ABC&DEF", "", 1.0),
    ];
    assert_eq!(AttributionUseCase::tickers_to_fetch(&holdings), vec!["MSFT", "AAPL"]);
}
