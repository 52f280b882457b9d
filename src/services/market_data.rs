//! Market data source interfaces and the fallback wrappers around them.

use crate::config::Config;
use crate::error::ProviderError;
use crate::metrics::Metrics;
use crate::models::indicators::Candle;
use crate::services::{BinanceClient, BybitClient, MetalsClient};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Spot price for one symbol.
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this source can quote the (upper-cased) symbol.
    fn supports(&self, _symbol: &str) -> bool {
        true
    }

    async fn fetch_price(&self, symbol: &str) -> Result<f64, ProviderError>;
}

/// Historical OHLCV bars, oldest first.
#[async_trait]
pub trait CandleSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, ProviderError>;
}

/// Symbols newly available for trading.
#[async_trait]
pub trait ListingSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn new_listings(&self) -> Result<Vec<String>, ProviderError>;
}

/// Upper-case the symbol and make sure it is quoted in USDT.
pub fn normalize_symbol(symbol: &str) -> String {
    let sym = symbol.trim().to_uppercase();
    if sym.ends_with("USDT") {
        sym
    } else {
        format!("{}USDT", sym)
    }
}

/// Ranked ladder of price sources; the first positive quote wins.
pub struct PriceFeed {
    sources: Vec<Arc<dyn PriceSource>>,
    metrics: Option<Arc<Metrics>>,
}

impl PriceFeed {
    pub fn new(sources: Vec<Arc<dyn PriceSource>>) -> Self {
        Self {
            sources,
            metrics: None,
        }
    }

    /// Metals for gold, then Binance, then Bybit.
    pub fn from_config(config: &Config) -> Self {
        let timeout = config.http_timeout_secs;
        Self::new(vec![
            Arc::new(MetalsClient::new(
                config.metals_base_url.clone(),
                config.metals_api_key.clone(),
                timeout,
            )),
            Arc::new(BinanceClient::new(config.binance_base_url.clone(), timeout)),
            Arc::new(BybitClient::new(
                config.bybit_base_url.clone(),
                timeout,
                config.listing_cutoff_ms,
            )),
        ])
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn get_price(&self, symbol: &str) -> Option<f64> {
        let symbol = symbol.trim().to_uppercase();

        for source in self.sources.iter().filter(|s| s.supports(&symbol)) {
            match source.fetch_price(&symbol).await {
                Ok(price) if price.is_finite() && price > 0.0 => {
                    debug!(source = source.name(), symbol = %symbol, price, "price fetched");
                    return Some(price);
                }
                Ok(price) => {
                    let error = ProviderError::InvalidPrice {
                        provider: source.name(),
                        price,
                    };
                    self.record_failure(source.name(), &symbol, &error);
                }
                Err(error) => self.record_failure(source.name(), &symbol, &error),
            }
        }

        warn!(symbol = %symbol, "failed to fetch price from every source");
        None
    }

    /// Current price of each asset, in the order given.
    pub async fn price_health(&self, assets: &[String]) -> IndexMap<String, Option<f64>> {
        let mut status = IndexMap::with_capacity(assets.len());
        for asset in assets {
            let price = self.get_price(asset).await;
            status.insert(asset.clone(), price);
        }
        status
    }

    fn record_failure(&self, source: &'static str, symbol: &str, error: &ProviderError) {
        warn!(source, symbol = %symbol, error = %error, "price source failed");
        if let Some(ref metrics) = self.metrics {
            metrics.record_upstream_failure(source);
        }
    }
}

/// Bounded bar-window fetch that degrades to an empty window.
#[derive(Clone)]
pub struct OhlcFetcher {
    source: Arc<dyn CandleSource>,
    metrics: Option<Arc<Metrics>>,
}

impl OhlcFetcher {
    pub fn new(source: Arc<dyn CandleSource>) -> Self {
        Self {
            source,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn fetch(&self, symbol: &str, interval: &str, limit: usize) -> Vec<Candle> {
        match self.source.fetch_candles(symbol, interval, limit).await {
            Ok(mut candles) => {
                candles.sort_by_key(|c| c.timestamp);
                let excess = candles.len().saturating_sub(limit);
                candles.drain(..excess);
                debug!(
                    source = self.source.name(),
                    symbol,
                    interval,
                    count = candles.len(),
                    "candles fetched"
                );
                candles
            }
            Err(error) => {
                warn!(
                    source = self.source.name(),
                    symbol,
                    interval,
                    error = %error,
                    "OHLC fetch failed"
                );
                if let Some(ref metrics) = self.metrics {
                    metrics.record_upstream_failure(self.source.name());
                }
                Vec::new()
            }
        }
    }
}
