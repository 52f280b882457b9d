//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::models::indicators::{Candle, MacdIndicator};

/// Calculate MACD indicator
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD, seeded at the first defined MACD value
/// Histogram = MACD - Signal
///
/// The line needs `slow` bars and the signal line another `signal - 1`.
pub fn calculate_macd(
    candles: &[Candle],
    fast_period: u32,
    slow_period: u32,
    signal_period: u32,
) -> Option<MacdIndicator> {
    if fast_period == 0 || slow_period == 0 || signal_period == 0 {
        return None;
    }
    let required = slow_period as usize + signal_period as usize - 1;
    if candles.len() < required {
        return None;
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let fast = math::ewm(&closes, math::span_alpha(fast_period));
    let slow = math::ewm(&closes, math::span_alpha(slow_period));

    let first_defined = (slow_period.max(fast_period) - 1) as usize;
    let macd_values: Vec<f64> = fast[first_defined..]
        .iter()
        .zip(&slow[first_defined..])
        .map(|(f, s)| f - s)
        .collect();

    if macd_values.len() < signal_period as usize {
        return None;
    }

    let signal_values = math::ewm(&macd_values, math::span_alpha(signal_period));
    let macd = *macd_values.last()?;
    let signal = *signal_values.last()?;

    Some(MacdIndicator {
        macd,
        signal,
        histogram: macd - signal,
        period: Some((fast_period, slow_period, signal_period)),
    })
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(candles: &[Candle]) -> Option<MacdIndicator> {
    calculate_macd(candles, 12, 26, 9)
}
