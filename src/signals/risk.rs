//! Stop-loss and take-profit levels

use crate::common::math::{round2, sample_std_dev};
use crate::models::indicators::Candle;
use crate::models::signal::{RiskLevels, TraderProfile};

#[derive(Debug, Clone)]
pub struct RiskCalculator {
    /// At or above this confidence the ladder gets the long target set.
    pub high_confidence: f64,
    pub short_targets: usize,
    pub long_targets: usize,
}

impl Default for RiskCalculator {
    fn default() -> Self {
        Self {
            high_confidence: 0.90,
            short_targets: 3,
            long_targets: 6,
        }
    }
}

impl RiskCalculator {
    /// Levels spaced by the sample standard deviation of the window's highs,
    /// around the latest close. An empty window has no levels.
    pub fn levels(&self, candles: &[Candle], confidence: f64) -> RiskLevels {
        let latest = match candles.last() {
            Some(latest) => latest,
            None => return RiskLevels::default(),
        };

        let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
        let volatility = sample_std_dev(&highs).unwrap_or(0.0);

        let targets = if confidence < self.high_confidence {
            self.short_targets
        } else {
            self.long_targets
        };

        RiskLevels {
            stop_loss: Some(round2(latest.close - volatility)),
            take_profits: (1..=targets)
                .map(|step| round2(latest.close + volatility * step as f64))
                .collect(),
        }
    }
}

const MINOR_LOT_CAP: f64 = 0.1;
const BASE_LOT_CAP: f64 = 0.2;

/// Maximum lot per day. `None` means uncapped (admins and VIPs).
///
/// Under-18 or unknown age gets the minor cap; unknown vibe or tier values
/// add nothing.
pub fn max_lot(profile: &TraderProfile) -> Option<f64> {
    if profile.is_admin || profile.vip {
        return None;
    }
    if profile.age.unwrap_or(0) < 18 {
        return Some(MINOR_LOT_CAP);
    }

    let vibe_bonus = match profile.vibe.as_deref() {
        Some("high") => 0.05,
        Some("medium") => 0.02,
        _ => 0.0,
    };
    let tier_bonus = match profile.subscription.as_deref() {
        Some("pro") => 0.05,
        Some("plus") => 0.025,
        _ => 0.0,
    };
    Some(round3(BASE_LOT_CAP + vibe_bonus + tier_bonus))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
