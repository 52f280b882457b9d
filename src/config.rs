//! Process configuration
//!
//! Everything is read once from the environment into a [`Config`] that is
//! handed to each component at construction time.

use std::env;
use std::str::FromStr;

/// Thresholds used by the indicator scorer.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub rsi_period: u32,
    pub macd_fast: u32,
    pub macd_slow: u32,
    pub macd_signal: u32,
    pub bollinger_period: u32,
    pub bollinger_std_dev: f64,
    /// Upper wick measured against this fraction of the close.
    pub wick_ratio: f64,
    /// Latest volume must exceed the window mean times this factor.
    pub volume_multiplier: f64,
    /// Low must dip below open times this factor for a bullish candle.
    pub candle_low_ratio: f64,
    pub directional_confidence: f64,
    pub hold_confidence: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub override_bonus: f64,
    pub max_confidence: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            wick_ratio: 0.01,
            volume_multiplier: 1.5,
            candle_low_ratio: 0.99,
            directional_confidence: 0.90,
            hold_confidence: 0.80,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            override_bonus: 0.05,
            max_confidence: 0.99,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub explanation_model: String,

    pub chat_model: String,
    pub chat_max_history: usize,
    pub chat_temperature: f64,
    pub chat_max_tokens: u32,

    pub binance_base_url: String,
    pub bybit_base_url: String,
    pub metals_base_url: String,
    pub metals_api_key: Option<String>,

    pub http_timeout_secs: u64,
    pub generation_timeout_secs: u64,

    pub intervals: Vec<String>,
    pub risk_interval: String,
    pub window_size: usize,
    pub scoring: ScoringConfig,

    pub scan_symbols: Vec<String>,
    pub scan_min_confidence: f64,
    pub listing_cutoff_ms: i64,

    pub health_assets: Vec<String>,

    pub port: u16,
    pub scan_interval_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            explanation_model: "gpt-4".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            chat_max_history: 10,
            chat_temperature: 0.7,
            chat_max_tokens: 1000,
            binance_base_url: "https://api.binance.com".to_string(),
            bybit_base_url: "https://api.bybit.com".to_string(),
            metals_base_url: "https://api.metalpriceapi.com".to_string(),
            metals_api_key: None,
            http_timeout_secs: 10,
            generation_timeout_secs: 30,
            intervals: vec!["15m".to_string(), "1h".to_string(), "4h".to_string()],
            risk_interval: "1h".to_string(),
            window_size: 100,
            scoring: ScoringConfig::default(),
            scan_symbols: vec![
                "DOGEUSDT".to_string(),
                "SHIBUSDT".to_string(),
                "PEPEUSDT".to_string(),
            ],
            scan_min_confidence: 0.955,
            listing_cutoff_ms: 1_680_000_000_000,
            health_assets: ["XAUUSD", "BTC", "ETH", "DOGE", "SHIB", "PEPE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            port: 8080,
            scan_interval_seconds: 0,
        }
    }
}

impl Config {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openai_base_url: var_or("OPENAI_BASE_URL", defaults.openai_base_url),
            explanation_model: var_or("CHATZIPT_EXPLANATION_MODEL", defaults.explanation_model),
            chat_model: var_or("CHATZIPT_MODEL", defaults.chat_model),
            chat_max_history: parsed_or("CHATZIPT_MAX_HISTORY", defaults.chat_max_history),
            chat_temperature: parsed_or("CHATZIPT_TEMPERATURE", defaults.chat_temperature),
            chat_max_tokens: parsed_or("CHATZIPT_MAX_TOKENS", defaults.chat_max_tokens),
            binance_base_url: var_or("BINANCE_BASE_URL", defaults.binance_base_url),
            bybit_base_url: var_or("BYBIT_BASE_URL", defaults.bybit_base_url),
            metals_base_url: var_or("METALS_BASE_URL", defaults.metals_base_url),
            metals_api_key: non_empty_var("METALS_API_KEY"),
            http_timeout_secs: parsed_or("HTTP_TIMEOUT_SECONDS", defaults.http_timeout_secs),
            generation_timeout_secs: parsed_or(
                "GENERATION_TIMEOUT_SECONDS",
                defaults.generation_timeout_secs,
            ),
            intervals: non_empty_var("SIGNAL_INTERVALS")
                .and_then(|raw| parse_intervals(&raw))
                .unwrap_or(defaults.intervals),
            risk_interval: var_or("RISK_INTERVAL", defaults.risk_interval),
            window_size: parsed_or("WINDOW_SIZE", defaults.window_size),
            scoring: defaults.scoring,
            scan_symbols: list_or("SCAN_SYMBOLS", defaults.scan_symbols),
            scan_min_confidence: parsed_or("SCAN_MIN_CONFIDENCE", defaults.scan_min_confidence),
            listing_cutoff_ms: parsed_or("LISTING_CUTOFF_MS", defaults.listing_cutoff_ms),
            health_assets: list_or("HEALTH_ASSETS", defaults.health_assets),
            port: parsed_or("PORT", defaults.port),
            scan_interval_seconds: parsed_or("SCAN_INTERVAL_SECONDS", defaults.scan_interval_seconds),
        }
    }

    pub fn is_api_configured(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

/// Number of timeframes confluence averages over.
pub const CONFLUENCE_INTERVALS: usize = 3;

/// Comma-separated interval list. Anything other than exactly
/// [`CONFLUENCE_INTERVALS`] distinct entries is rejected.
pub fn parse_intervals(raw: &str) -> Option<Vec<String>> {
    let items = split_list(raw);
    let distinct = items
        .iter()
        .enumerate()
        .all(|(i, item)| !items[..i].contains(item));
    (items.len() == CONFLUENCE_INTERVALS && distinct).then_some(items)
}

/// Deployment environment, used to pick the log format.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(key: &str, default: String) -> String {
    non_empty_var(key).unwrap_or(default)
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn list_or(key: &str, default: Vec<String>) -> Vec<String> {
    match non_empty_var(key).map(|raw| split_list(&raw)) {
        Some(items) if !items.is_empty() => items,
        _ => default,
    }
}
