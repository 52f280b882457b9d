use std::sync::Arc;

use chatzipt::metrics::Metrics;
use chatzipt::services::{normalize_symbol, CandleSource, OhlcFetcher, PriceFeed, PriceSource};

use crate::support::{bar, FakeCandles, FakePrice};

#[test]
fn symbols_are_quoted_in_usdt() {
    assert_eq!(normalize_symbol("btc"), "BTCUSDT");
    assert_eq!(normalize_symbol("ethusdt"), "ETHUSDT");
    assert_eq!(normalize_symbol(" DOGE "), "DOGEUSDT");
}

#[tokio::test]
async fn first_successful_source_wins() {
    let first = Arc::new(FakePrice::failing("first"));
    let second = Arc::new(FakePrice::quoting("second", 42.0));
    let third = Arc::new(FakePrice::quoting("third", 99.0));
    let sources: Vec<Arc<dyn PriceSource>> = vec![first.clone(), second.clone(), third.clone()];

    let price = PriceFeed::new(sources).get_price("btc").await;

    assert_eq!(price, Some(42.0));
    assert_eq!(first.calls(), vec!["BTC"]);
    assert_eq!(second.calls(), vec!["BTC"]);
    assert!(third.calls().is_empty());
}

#[tokio::test]
async fn unsupported_sources_are_skipped() {
    let gold = Arc::new(FakePrice::quoting("gold", 2300.0).only("XAUUSD"));
    let crypto = Arc::new(FakePrice::quoting("crypto", 65000.0));
    let sources: Vec<Arc<dyn PriceSource>> = vec![gold.clone(), crypto.clone()];
    let feed = PriceFeed::new(sources);

    assert_eq!(feed.get_price("BTC").await, Some(65000.0));
    assert!(gold.calls().is_empty());
    assert_eq!(feed.get_price("xauusd").await, Some(2300.0));
}

#[tokio::test]
async fn non_positive_quotes_fall_through() {
    let sources: Vec<Arc<dyn PriceSource>> = vec![
        Arc::new(FakePrice::quoting("zero", 0.0)),
        Arc::new(FakePrice::quoting("negative", -1.0)),
        Arc::new(FakePrice::quoting("good", 3.5)),
    ];
    assert_eq!(PriceFeed::new(sources).get_price("ETH").await, Some(3.5));
}

#[tokio::test]
async fn total_failure_is_absent_and_counted() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let sources: Vec<Arc<dyn PriceSource>> = vec![
        Arc::new(FakePrice::failing("a")),
        Arc::new(FakePrice::failing("b")),
    ];
    let feed = PriceFeed::new(sources).with_metrics(metrics.clone());

    assert_eq!(feed.get_price("BTC").await, None);
    assert_eq!(metrics.upstream_failures_total.with_label_values(&["a"]).get(), 1);
    assert_eq!(metrics.upstream_failures_total.with_label_values(&["b"]).get(), 1);
}

#[tokio::test]
async fn price_health_keeps_asset_order() {
    let sources: Vec<Arc<dyn PriceSource>> = vec![
        Arc::new(FakePrice::quoting("gold", 2300.0).only("XAUUSD")),
    ];
    let assets = vec!["XAUUSD".to_string(), "BTC".to_string()];
    let health = PriceFeed::new(sources).price_health(&assets).await;

    let entries: Vec<(&str, Option<f64>)> =
        health.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    assert_eq!(entries, vec![("XAUUSD", Some(2300.0)), ("BTC", None)]);
}

#[tokio::test]
async fn fetcher_sorts_and_bounds_the_window() {
    let shuffled = vec![
        bar(2, 3.0, 3.0, 3.0, 3.0, 1.0),
        bar(0, 1.0, 1.0, 1.0, 1.0, 1.0),
        bar(1, 2.0, 2.0, 2.0, 2.0, 1.0),
    ];
    let source: Arc<dyn CandleSource> = Arc::new(FakeCandles::default().with("1h", shuffled));
    let candles = OhlcFetcher::new(source).fetch("BTC", "1h", 2).await;

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    assert_eq!(closes, vec![2.0, 3.0]);
}

#[tokio::test]
async fn fetcher_turns_errors_into_an_empty_window() {
    let source: Arc<dyn CandleSource> = Arc::new(FakeCandles::failing());
    assert!(OhlcFetcher::new(source).fetch("BTC", "1h", 100).await.is_empty());
}
