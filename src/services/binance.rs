//! Binance spot REST client: ticker prices and klines

use super::market_data::{normalize_symbol, CandleSource, PriceSource};
use super::{http_client, value_as_f64};
use crate::error::ProviderError;
use crate::models::indicators::Candle;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

const PROVIDER: &str = "binance";

#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: Value,
}

pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self::with_client(base_url, http_client(timeout_secs))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn ticker_price(&self, symbol: &str) -> Result<f64, ProviderError> {
        let url = format!("{}/api/v3/ticker/price", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("symbol", normalize_symbol(symbol))])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let ticker: TickerPrice = response.json().await?;
        value_as_f64(&ticker.price)
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "price is not a number"))
    }

    pub async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, ProviderError> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", normalize_symbol(symbol)),
                ("interval", interval.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let rows: Vec<Vec<Value>> = response.json().await?;
        rows.iter().map(|row| parse_kline(row)).collect()
    }
}

/// `[open_time, open, high, low, close, volume, close_time, ...]`
fn parse_kline(row: &[Value]) -> Result<Candle, ProviderError> {
    if row.len() < 6 {
        return Err(ProviderError::malformed(
            PROVIDER,
            format!("kline row has {} fields", row.len()),
        ));
    }

    let open_time = row[0]
        .as_i64()
        .ok_or_else(|| ProviderError::malformed(PROVIDER, "kline open time is not an integer"))?;
    let timestamp = DateTime::<Utc>::from_timestamp_millis(open_time)
        .ok_or_else(|| ProviderError::malformed(PROVIDER, "kline open time out of range"))?;

    let field = |index: usize, name: &str| {
        value_as_f64(&row[index])
            .ok_or_else(|| ProviderError::malformed(PROVIDER, format!("kline {} is not a number", name)))
    };

    Ok(Candle::new(
        field(1, "open")?,
        field(2, "high")?,
        field(3, "low")?,
        field(4, "close")?,
        field(5, "volume")?,
        timestamp,
    ))
}

#[async_trait]
impl PriceSource for BinanceClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn supports(&self, symbol: &str) -> bool {
        symbol != "XAUUSD"
    }

    async fn fetch_price(&self, symbol: &str) -> Result<f64, ProviderError> {
        self.ticker_price(symbol).await
    }
}

#[async_trait]
impl CandleSource for BinanceClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, ProviderError> {
        self.klines(symbol, interval, limit).await
    }
}
