//! Bollinger Bands indicator

use crate::common::math;
use crate::models::indicators::{BollingerIndicator, Candle};

/// Calculate Bollinger Bands over the last `period` closes
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * population standard deviation)
/// Lower Band = Middle - (std_dev * population standard deviation)
/// Width = (Upper - Lower) / Middle * 100
pub fn calculate_bollinger_bands(
    candles: &[Candle],
    period: u32,
    std_dev: f64,
) -> Option<BollingerIndicator> {
    if period == 0 || candles.len() < period as usize {
        return None;
    }

    let closes: Vec<f64> = candles[candles.len() - period as usize..]
        .iter()
        .map(|c| c.close)
        .collect();
    let middle = math::mean(&closes)?;
    let std = math::population_std_dev(&closes)?;

    let upper = middle + (std_dev * std);
    let lower = middle - (std_dev * std);
    let width = if middle == 0.0 {
        0.0
    } else {
        (upper - lower) / middle * 100.0
    };

    Some(BollingerIndicator {
        upper,
        middle,
        lower,
        width,
        period,
        std_dev,
    })
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn calculate_bollinger_bands_default(candles: &[Candle]) -> Option<BollingerIndicator> {
    calculate_bollinger_bands(candles, 20, 2.0)
}
