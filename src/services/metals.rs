//! Metals price API client, the only source for gold (XAUUSD)

use super::market_data::{CandleSource, PriceSource};
use super::{http_client, value_as_f64};
use crate::common::math::round2;
use crate::error::ProviderError;
use crate::models::indicators::Candle;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde_json::Value;

const PROVIDER: &str = "metals";

/// The timeseries endpoint only serves daily bars.
const DAILY_INTERVAL: &str = "1d";

pub struct MetalsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl MetalsClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout_secs: u64) -> Self {
        Self::with_client(base_url, api_key, http_client(timeout_secs))
    }

    pub fn with_client(base_url: impl Into<String>, api_key: Option<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// USD per troy ounce, from the XAU-per-USD rate.
    pub async fn gold_price(&self) -> Result<f64, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("METALS_API_KEY"))?;

        let url = format!("{}/v1/latest", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", api_key), ("base", "USD"), ("currencies", "XAU")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let body: Value = response.json().await?;
        parse_gold_rate(&body)
    }

    /// Daily XAU bars in USD between two dates (inclusive), oldest first.
    pub async fn daily_ohlc(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Candle>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("METALS_API_KEY"))?;

        let url = format!("{}/v1/timeseries", self.base_url);
        let start_date = start.format("%Y-%m-%d").to_string();
        let end_date = end.format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", api_key),
                ("base", "USD"),
                ("currencies", "XAU"),
                ("start_date", start_date.as_str()),
                ("end_date", end_date.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let body: Value = response.json().await?;
        parse_daily_bars(&body)
    }
}

fn check_error(body: &Value) -> Result<(), ProviderError> {
    let failed = body.get("status").and_then(Value::as_str) == Some("error")
        || body.get("success").and_then(Value::as_bool) == Some(false)
        || body.get("error").map_or(false, is_truthy);
    if failed {
        return Err(ProviderError::malformed(PROVIDER, error_reason(body)));
    }
    Ok(())
}

fn parse_gold_rate(body: &Value) -> Result<f64, ProviderError> {
    check_error(body)?;

    let rate = body
        .get("rates")
        .and_then(|rates| rates.get("XAU"))
        .and_then(value_as_f64)
        .ok_or_else(|| ProviderError::malformed(PROVIDER, "missing XAU rate"))?;

    if !rate.is_finite() || rate <= 0.0 {
        return Err(ProviderError::InvalidPrice {
            provider: PROVIDER,
            price: rate,
        });
    }

    Ok(round2(1.0 / rate))
}

/// `rates` maps `YYYY-MM-DD` to `{"XAU": {"o", "h", "l", "c"}}`.
fn parse_daily_bars(body: &Value) -> Result<Vec<Candle>, ProviderError> {
    check_error(body)?;

    let rates = body
        .get("rates")
        .and_then(Value::as_object)
        .ok_or_else(|| ProviderError::malformed(PROVIDER, "missing rates"))?;

    let mut bars = Vec::with_capacity(rates.len());
    for (date, entry) in rates {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| ProviderError::malformed(PROVIDER, format!("bad date {}: {}", date, e)))?;
        let timestamp = day
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| ProviderError::malformed(PROVIDER, format!("bad date {}", date)))?;

        let bar = entry
            .get("XAU")
            .ok_or_else(|| ProviderError::malformed(PROVIDER, format!("missing XAU bar on {}", date)))?;
        let field = |key: &str| {
            bar.get(key).and_then(value_as_f64).ok_or_else(|| {
                ProviderError::malformed(PROVIDER, format!("missing {} on {}", key, date))
            })
        };

        bars.push(Candle::new(
            field("o")?,
            field("h")?,
            field("l")?,
            field("c")?,
            0.0,
            timestamp,
        ));
    }

    bars.sort_by_key(|c| c.timestamp);
    Ok(bars)
}

fn error_reason(body: &Value) -> String {
    match body.get("error") {
        Some(Value::String(msg)) => msg.clone(),
        Some(Value::Object(obj)) => obj
            .get("message")
            .or_else(|| obj.get("info"))
            .and_then(Value::as_str)
            .unwrap_or("upstream reported an error")
            .to_string(),
        _ => "upstream reported an error".to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(false, |v| v != 0.0),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[async_trait]
impl PriceSource for MetalsClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn supports(&self, symbol: &str) -> bool {
        symbol == "XAUUSD"
    }

    async fn fetch_price(&self, _symbol: &str) -> Result<f64, ProviderError> {
        self.gold_price().await
    }
}

/// Daily gold bars ending today (UTC); `limit` counts calendar days.
#[async_trait]
impl CandleSource for MetalsClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, ProviderError> {
        if symbol != "XAUUSD" || interval != DAILY_INTERVAL {
            return Err(ProviderError::malformed(
                PROVIDER,
                format!("no {} bars for {}", interval, symbol),
            ));
        }

        let end = Utc::now().date_naive();
        let days = i64::try_from(limit.max(1)).unwrap_or(i64::MAX).min(365);
        let start = end - Duration::days(days - 1);
        self.daily_ohlc(start, end).await
    }
}
