//! Upstream sources and the components that rank and wrap them.

pub mod binance;
pub mod bybit;
pub mod market_data;
pub mod metals;
pub mod openai;

pub use binance::BinanceClient;
pub use bybit::BybitClient;
pub use market_data::{
    normalize_symbol, CandleSource, ListingSource, OhlcFetcher, PriceFeed, PriceSource,
};
pub use metals::MetalsClient;
pub use openai::{CompletionRequest, OpenAiClient, TextGenerator};

use serde_json::Value;
use std::time::Duration;

/// Shared HTTP client with a per-request timeout.
pub fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("chatzipt/0.1")
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Read a number that upstreams send either as JSON number or string.
pub(crate) fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
