//! ChatZiPT Scanner
//!
//! Runs the high-confidence scan on a cron schedule derived from
//! `SCAN_INTERVAL_SECONDS`.

use chatzipt::config::{get_environment, Config};
use chatzipt::core::scheduler::ScanScheduler;
use chatzipt::logging;
use chatzipt::metrics::Metrics;
use chatzipt::services::{BybitClient, ListingSource, OpenAiClient, PriceFeed, TextGenerator};
use chatzipt::signals::{Scanner, SignalAssembler};
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env();

    let env = get_environment();
    info!("Starting ChatZiPT Scanner");
    info!(environment = %env, "Environment");

    if config.scan_interval_seconds == 0 {
        return Err("SCAN_INTERVAL_SECONDS must be > 0 for the scanner".into());
    }

    let metrics = Arc::new(Metrics::new()?);
    let price_feed = Arc::new(PriceFeed::from_config(&config).with_metrics(metrics.clone()));
    let generator = OpenAiClient::from_config(&config)
        .map(|client| Arc::new(client) as Arc<dyn TextGenerator>);
    let assembler = Arc::new(
        SignalAssembler::from_config(&config, price_feed, generator).with_metrics(metrics),
    );
    let listings: Arc<dyn ListingSource> = Arc::new(BybitClient::new(
        config.bybit_base_url.clone(),
        config.http_timeout_secs,
        config.listing_cutoff_ms,
    ));
    let scanner = Arc::new(Scanner::new(
        assembler,
        Some(listings),
        config.scan_symbols.clone(),
        config.scan_min_confidence,
    ));

    let scheduler = ScanScheduler::new(scanner, config.scan_interval_seconds)
        .map_err(|e| e.to_string())?;
    scheduler.start().await;

    info!(
        symbols = ?config.scan_symbols,
        min_confidence = config.scan_min_confidence,
        "Scanner running, waiting for shutdown signal..."
    );
    signal::ctrl_c().await?;

    info!("Shutting down scanner...");
    scheduler.stop().await;
    info!("Scanner stopped");

    Ok(())
}
