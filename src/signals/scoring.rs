//! Single-window indicator scoring
//!
//! Three heuristic votes on the latest bar (wick, volume, candle shape) are
//! reduced by plurality, then an RSI/MACD extreme may override the result.

use crate::common::math;
use crate::config::ScoringConfig;
use crate::indicators::{calculate_bollinger_bands, calculate_macd, calculate_rsi};
use crate::models::indicators::{Candle, IndicatorSnapshot};
use crate::models::signal::{Action, IndicatorVote};
use crate::signals::voting::plurality;

/// Action and confidence returned for windows too short to score.
pub const DEGENERATE_SCORE: (Action, f64) = (Action::Hold, 0.5);

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalScore {
    pub action: Action,
    pub confidence: f64,
    pub votes: Vec<IndicatorVote>,
    pub snapshot: IndicatorSnapshot,
}

impl IntervalScore {
    fn degenerate() -> Self {
        Self {
            action: DEGENERATE_SCORE.0,
            confidence: DEGENERATE_SCORE.1,
            votes: Vec::new(),
            snapshot: IndicatorSnapshot::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorScorer {
    config: ScoringConfig,
}

impl IndicatorScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, candles: &[Candle]) -> IntervalScore {
        let latest = match candles {
            [.., _, latest] => latest,
            _ => return IntervalScore::degenerate(),
        };

        let snapshot = self.snapshot(candles);

        let votes = vec![
            IndicatorVote::new("smc", self.wick_vote(latest)),
            IndicatorVote::new("wyckoff", self.volume_vote(candles, latest)),
            IndicatorVote::new("candle", self.candle_vote(latest)),
        ];
        let actions: Vec<Action> = votes.iter().map(|v| v.action).collect();
        let mut action = plurality(&actions).unwrap_or(Action::Hold);

        let mut confidence = if action.is_directional() {
            self.config.directional_confidence
        } else {
            self.config.hold_confidence
        };

        if let Some(forced) = self.momentum_override(&snapshot) {
            action = forced;
            confidence += self.config.override_bonus;
        }

        IntervalScore {
            action,
            confidence: confidence.min(self.config.max_confidence),
            votes,
            snapshot,
        }
    }

    fn snapshot(&self, candles: &[Candle]) -> IndicatorSnapshot {
        let cfg = &self.config;
        let mut snapshot = IndicatorSnapshot::default();
        if let Some(rsi) = calculate_rsi(candles, cfg.rsi_period) {
            snapshot = snapshot.with_rsi(rsi);
        }
        if let Some(macd) = calculate_macd(candles, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal) {
            snapshot = snapshot.with_macd(macd);
        }
        if let Some(bands) =
            calculate_bollinger_bands(candles, cfg.bollinger_period, cfg.bollinger_std_dev)
        {
            snapshot = snapshot.with_bollinger(bands);
        }
        snapshot
    }

    /// Upper wick against a fraction of the close.
    fn wick_vote(&self, latest: &Candle) -> Action {
        let wick = latest.high - latest.close;
        let threshold = latest.close * self.config.wick_ratio;
        if wick > threshold {
            Action::Long
        } else if wick < -threshold {
            Action::Short
        } else {
            Action::Hold
        }
    }

    fn volume_vote(&self, candles: &[Candle], latest: &Candle) -> Action {
        let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
        match math::mean(&volumes) {
            Some(avg) if latest.volume > avg * self.config.volume_multiplier => Action::Long,
            _ => Action::Hold,
        }
    }

    fn candle_vote(&self, latest: &Candle) -> Action {
        if latest.close > latest.open && latest.low < latest.open * self.config.candle_low_ratio {
            Action::Long
        } else {
            Action::Hold
        }
    }

    /// Oversold with MACD above signal forces LONG; overbought with MACD
    /// below signal forces SHORT. Needs both indicators defined.
    fn momentum_override(&self, snapshot: &IndicatorSnapshot) -> Option<Action> {
        let rsi = snapshot.rsi.as_ref()?.value;
        let macd = snapshot.macd.as_ref()?;

        if rsi < self.config.rsi_oversold && macd.macd > macd.signal {
            Some(Action::Long)
        } else if rsi > self.config.rsi_overbought && macd.macd < macd.signal {
            Some(Action::Short)
        } else {
            None
        }
    }
}
