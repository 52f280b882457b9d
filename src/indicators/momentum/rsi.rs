//! RSI (Relative Strength Index) indicator

use crate::common::math;
use crate::models::indicators::{Candle, RsiIndicator};

/// Calculate RSI with Wilder smoothing
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = smoothed gain / smoothed loss, both exponentially averaged with
/// alpha = 1 / period. The first bar has no predecessor and counts as an
/// unchanged close.
pub fn calculate_rsi(candles: &[Candle], period: u32) -> Option<RsiIndicator> {
    if period == 0 || candles.len() < period as usize {
        return None;
    }

    let mut gains = Vec::with_capacity(candles.len());
    let mut losses = Vec::with_capacity(candles.len());
    gains.push(0.0);
    losses.push(0.0);

    for pair in candles.windows(2) {
        let change = pair[1].close - pair[0].close;
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    let alpha = 1.0 / period as f64;
    let avg_gain = *math::ewm(&gains, alpha).last()?;
    let avg_loss = *math::ewm(&losses, alpha).last()?;

    let value = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    };

    Some(RsiIndicator {
        value,
        period: Some(period),
    })
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(candles: &[Candle]) -> Option<RsiIndicator> {
    calculate_rsi(candles, 14)
}
