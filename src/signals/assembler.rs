//! Composes price, confluence, explanation and risk into one [`Signal`]

use crate::config::Config;
use crate::metrics::Metrics;
use crate::models::signal::{Signal, UserContext};
use crate::services::market_data::{CandleSource, OhlcFetcher, PriceFeed};
use crate::services::openai::TextGenerator;
use crate::services::BinanceClient;
use crate::signals::confluence::ConfluenceAggregator;
use crate::signals::explanation::ExplanationGenerator;
use crate::signals::risk::RiskCalculator;
use crate::signals::scoring::IndicatorScorer;
use crate::signals::serial::generate_serial;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub struct SignalAssembler {
    price_feed: Arc<PriceFeed>,
    confluence: ConfluenceAggregator,
    explainer: ExplanationGenerator,
    fetcher: OhlcFetcher,
    risk: RiskCalculator,
    risk_interval: String,
    window_size: usize,
    metrics: Option<Arc<Metrics>>,
}

impl SignalAssembler {
    pub fn new(
        config: &Config,
        price_feed: Arc<PriceFeed>,
        candles: Arc<dyn CandleSource>,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        let fetcher = OhlcFetcher::new(candles);
        let confluence = ConfluenceAggregator::new(
            fetcher.clone(),
            IndicatorScorer::new(config.scoring.clone()),
            config.intervals.clone(),
            config.window_size,
        );

        Self {
            price_feed,
            confluence,
            explainer: ExplanationGenerator::new(generator, config.explanation_model.clone()),
            fetcher,
            risk: RiskCalculator::default(),
            risk_interval: config.risk_interval.clone(),
            window_size: config.window_size,
            metrics: None,
        }
    }

    /// Live sources: Binance klines and the configured price ladder.
    pub fn from_config(
        config: &Config,
        price_feed: Arc<PriceFeed>,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        let candles = Arc::new(BinanceClient::new(
            config.binance_base_url.clone(),
            config.http_timeout_secs,
        ));
        Self::new(config, price_feed, candles, generator)
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.fetcher = self.fetcher.with_metrics(metrics.clone());
        self.confluence = self.confluence.with_metrics(metrics.clone());
        self.metrics = Some(metrics);
        self
    }

    /// Runs the whole chain for one symbol. Upstream failures degrade the
    /// affected fields; assembly itself always succeeds.
    pub async fn assemble(&self, symbol: &str, user: Option<&UserContext>) -> Signal {
        let started = Instant::now();
        let symbol = symbol.trim().to_uppercase();

        let price = self.price_feed.get_price(&symbol).await;
        let consensus = self.confluence.evaluate(&symbol).await;
        let explanation = self
            .explainer
            .explain(&symbol, consensus.action, price, consensus.confidence)
            .await;

        // Risk uses its own window, fetched independently of the confluence ones.
        let window = self
            .fetcher
            .fetch(&symbol, &self.risk_interval, self.window_size)
            .await;
        let risk = self.risk.levels(&window, consensus.confidence);

        let user = user.cloned().unwrap_or_default();
        let signal = Signal {
            serial_number: generate_serial(&symbol),
            symbol,
            action: consensus.action,
            confidence: consensus.confidence,
            price,
            details: consensus.details,
            explanation,
            risk,
            aura_points: user.aura_points,
            pro_unlocked: user.pro_unlocked(),
        };

        let elapsed = started.elapsed().as_secs_f64();
        if let Some(ref metrics) = self.metrics {
            metrics.signals_assembled_total.inc();
            metrics.signal_assembly_duration_seconds.observe(elapsed);
        }

        info!(
            symbol = %signal.symbol,
            action = %signal.action,
            confidence = signal.confidence,
            price = ?signal.price,
            serial = %signal.serial_number,
            elapsed_secs = elapsed,
            "signal assembled"
        );

        signal
    }
}
