//! Bybit v5 market client: linear ticker prices and spot listings

use super::market_data::{normalize_symbol, ListingSource, PriceSource};
use super::{http_client, value_as_f64, value_as_i64};
use crate::error::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

const PROVIDER: &str = "bybit";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<TickerList<T>>,
}

#[derive(Debug, Deserialize)]
struct TickerList<T> {
    list: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinearTicker {
    last_price: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpotTicker {
    symbol: String,
    list_time: Option<Value>,
}

pub struct BybitClient {
    client: Client,
    base_url: String,
    listing_cutoff_ms: i64,
}

impl BybitClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64, listing_cutoff_ms: i64) -> Self {
        Self::with_client(base_url, http_client(timeout_secs), listing_cutoff_ms)
    }

    pub fn with_client(base_url: impl Into<String>, client: Client, listing_cutoff_ms: i64) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            listing_cutoff_ms,
        }
    }

    async fn get_tickers(&self, query: &[(&str, String)]) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}/v5/market/tickers", self.base_url);
        let response = self.client.get(&url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }

    pub async fn linear_price(&self, symbol: &str) -> Result<f64, ProviderError> {
        let response = self
            .get_tickers(&[
                ("category", "linear".to_string()),
                ("symbol", normalize_symbol(symbol)),
            ])
            .await?;

        let envelope: Envelope<LinearTicker> = response.json().await?;
        let ticker = envelope
            .result
            .and_then(|r| r.list)
            .and_then(|list| list.into_iter().next())
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "empty ticker list"))?;

        value_as_f64(&ticker.last_price)
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "lastPrice is not a number"))
    }

    /// Spot symbols listed after the configured cutoff.
    pub async fn spot_listings(&self) -> Result<Vec<String>, ProviderError> {
        let response = self
            .get_tickers(&[("category", "spot".to_string())])
            .await?;

        let envelope: Envelope<SpotTicker> = response.json().await?;
        let tickers = envelope.result.and_then(|r| r.list).unwrap_or_default();

        Ok(tickers
            .into_iter()
            .filter(|t| {
                t.list_time
                    .as_ref()
                    .and_then(value_as_i64)
                    .map_or(false, |listed| listed > self.listing_cutoff_ms)
            })
            .map(|t| t.symbol)
            .collect())
    }
}

#[async_trait]
impl PriceSource for BybitClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn supports(&self, symbol: &str) -> bool {
        symbol != "XAUUSD"
    }

    async fn fetch_price(&self, symbol: &str) -> Result<f64, ProviderError> {
        self.linear_price(symbol).await
    }
}

#[async_trait]
impl ListingSource for BybitClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn new_listings(&self) -> Result<Vec<String>, ProviderError> {
        self.spot_listings().await
    }
}
