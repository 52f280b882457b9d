//! Command line of the one-shot `chatzipt` binary

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Assemble ChatZiPT signals for one or more symbols")]
pub struct Cli {
    /// Symbols to analyze (e.g. BTC ETH XAUUSD)
    #[arg(default_values = ["BTC", "ETH", "XAUUSD"])]
    pub symbols: Vec<String>,

    /// Check the daily XAUUSD bullish engulfing setup instead
    #[arg(long)]
    pub xau_engulfing: bool,
}
