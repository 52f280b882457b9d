//! Multi-interval consensus

use crate::metrics::Metrics;
use crate::models::signal::{Action, ConfluenceResult, IntervalResult};
use crate::services::market_data::OhlcFetcher;
use crate::signals::scoring::{IndicatorScorer, DEGENERATE_SCORE};
use crate::signals::voting::plurality;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::debug;

/// Scores one fresh window per interval and reduces the results.
pub struct ConfluenceAggregator {
    fetcher: OhlcFetcher,
    scorer: IndicatorScorer,
    intervals: Vec<String>,
    window_size: usize,
}

impl ConfluenceAggregator {
    pub fn new(
        fetcher: OhlcFetcher,
        scorer: IndicatorScorer,
        intervals: Vec<String>,
        window_size: usize,
    ) -> Self {
        Self {
            fetcher,
            scorer,
            intervals,
            window_size,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.fetcher = self.fetcher.with_metrics(metrics);
        self
    }

    pub async fn evaluate(&self, symbol: &str) -> ConfluenceResult {
        let mut results = Vec::with_capacity(self.intervals.len());

        for interval in &self.intervals {
            let candles = self.fetcher.fetch(symbol, interval, self.window_size).await;
            let score = self.scorer.evaluate(&candles);
            debug!(
                symbol,
                interval = %interval,
                bars = candles.len(),
                action = %score.action,
                confidence = score.confidence,
                "interval scored"
            );
            results.push(IntervalResult {
                interval: interval.clone(),
                action: score.action,
                confidence: score.confidence,
            });
        }

        reduce(results)
    }
}

/// Plurality action and mean confidence over the interval results, in
/// the order given.
pub fn reduce(results: Vec<IntervalResult>) -> ConfluenceResult {
    let actions: Vec<Action> = results.iter().map(|r| r.action).collect();

    let (action, confidence) = match plurality(&actions) {
        Some(action) => {
            let total: f64 = results.iter().map(|r| r.confidence).sum();
            (action, total / results.len() as f64)
        }
        None => DEGENERATE_SCORE,
    };

    let details: IndexMap<String, IntervalResult> = results
        .into_iter()
        .map(|r| (r.interval.clone(), r))
        .collect();

    ConfluenceResult {
        action,
        confidence,
        details,
    }
}
