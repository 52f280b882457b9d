//! Daily bullish engulfing setup on gold

use crate::common::math::round2;
use crate::models::indicators::Candle;
use crate::services::market_data::OhlcFetcher;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const ENGULFING_SYMBOL: &str = "XAUUSD";
pub const ENGULFING_CONFIDENCE: f64 = 0.95;

/// Three calendar days, so a missing current-day bar still leaves two.
const LOOKBACK_DAYS: usize = 3;

/// LONG entry derived from an engulfing pattern on the latest daily bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngulfingSetup {
    pub symbol: String,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profits: Vec<f64>,
    pub confidence: f64,
}

/// The last two bars: a bearish bar whose body is engulfed by a bullish one.
pub fn detect_bullish_engulfing(candles: &[Candle]) -> bool {
    let (prev, curr) = match candles {
        [.., prev, curr] => (prev, curr),
        _ => return false,
    };

    if prev.close >= prev.open || curr.close <= curr.open {
        return false;
    }
    curr.open <= prev.close && curr.close >= prev.open
}

/// Stop half a range below the low, targets one to three ranges above the
/// close.
pub fn engulfing_setup(candles: &[Candle]) -> Option<EngulfingSetup> {
    if !detect_bullish_engulfing(candles) {
        return None;
    }
    let latest = candles.last()?;
    let range = latest.high - latest.low;

    Some(EngulfingSetup {
        symbol: ENGULFING_SYMBOL.to_string(),
        entry: round2(latest.close),
        stop_loss: round2(latest.low - 0.5 * range),
        take_profits: (1..=3)
            .map(|step| round2(latest.close + range * step as f64))
            .collect(),
        confidence: ENGULFING_CONFIDENCE,
    })
}

pub struct EngulfingDetector {
    fetcher: OhlcFetcher,
}

impl EngulfingDetector {
    /// `fetcher` must serve daily gold bars, e.g. the metals timeseries.
    pub fn new(fetcher: OhlcFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn check(&self) -> Option<EngulfingSetup> {
        let bars = self
            .fetcher
            .fetch(ENGULFING_SYMBOL, "1d", LOOKBACK_DAYS)
            .await;
        let setup = engulfing_setup(&bars);
        info!(bars = bars.len(), detected = setup.is_some(), "XAUUSD engulfing check");
        setup
    }
}
