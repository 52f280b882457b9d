//! ChatZiPT one-shot analysis
//!
//! Assembles a signal for each symbol on the command line (default
//! `BTC ETH XAUUSD`) and prints a summary, or checks the daily gold
//! engulfing setup with `--xau-engulfing`.

use chatzipt::cli::Cli;
use chatzipt::config::Config;
use chatzipt::logging;
use chatzipt::models::signal::Signal;
use chatzipt::services::{MetalsClient, OhlcFetcher, OpenAiClient, PriceFeed, TextGenerator};
use chatzipt::signals::{EngulfingDetector, EngulfingSetup, SignalAssembler};
use clap::Parser;
use dotenvy::dotenv;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env();

    if cli.xau_engulfing {
        let metals = Arc::new(MetalsClient::new(
            config.metals_base_url.clone(),
            config.metals_api_key.clone(),
            config.http_timeout_secs,
        ));
        let detector = EngulfingDetector::new(OhlcFetcher::new(metals));
        match detector.check().await {
            Some(setup) => print_engulfing(&setup),
            None => println!("No bullish engulfing pattern detected on XAUUSD."),
        }
        return Ok(());
    }

    let price_feed = Arc::new(PriceFeed::from_config(&config));
    let generator = OpenAiClient::from_config(&config)
        .map(|client| Arc::new(client) as Arc<dyn TextGenerator>);
    let assembler = SignalAssembler::from_config(&config, price_feed, generator);

    for symbol in &cli.symbols {
        let signal = assembler.assemble(symbol, None).await;
        print_signal(&signal);
        println!();
    }

    Ok(())
}

fn print_signal(signal: &Signal) {
    println!("{} {}", signal.serial_number, signal.symbol);
    println!("  Action: {}", signal.action);
    println!("  Confidence: {:.2}%", signal.confidence * 100.0);
    match signal.price {
        Some(price) => println!("  Price: ${:.2}", price),
        None => println!("  Price: unavailable"),
    }
    for (interval, result) in &signal.details {
        println!(
            "    {:>4}: {} ({:.0}%)",
            interval,
            result.action,
            result.confidence * 100.0
        );
    }
    match signal.risk.stop_loss {
        Some(sl) => println!("  Stop loss: {:.2}", sl),
        None => println!("  Stop loss: n/a"),
    }
    if !signal.risk.take_profits.is_empty() {
        let targets: Vec<String> = signal
            .risk
            .take_profits
            .iter()
            .map(|tp| format!("{:.2}", tp))
            .collect();
        println!("  Take profits: {}", targets.join(", "));
    }
    println!("  Explanation: {}", signal.explanation);
}

fn print_engulfing(setup: &EngulfingSetup) {
    println!("Pattern: Bullish Engulfing on {} DAILY", setup.symbol);
    println!("  Entry: {:.2}", setup.entry);
    println!("  Stop loss: {:.2}", setup.stop_loss);
    for (idx, tp) in setup.take_profits.iter().enumerate() {
        println!("  TP{}: {:.2}", idx + 1, tp);
    }
    println!("  Confidence: {:.0}%", setup.confidence * 100.0);
}
