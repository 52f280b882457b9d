use chatzipt::indicators::{calculate_bollinger_bands, calculate_bollinger_bands_default};

use crate::support::drifting;

#[test]
fn bands_need_a_full_period() {
    let candles = drifting(100.0, &[(19, 1.0)]);
    assert!(calculate_bollinger_bands_default(&candles).is_none());
}

#[test]
fn constant_closes_have_zero_width() {
    let candles = drifting(100.0, &[(20, 0.0)]);
    let bands = calculate_bollinger_bands(&candles, 20, 2.0).unwrap();
    assert_eq!(bands.middle, 100.0);
    assert_eq!(bands.upper, bands.lower);
    assert_eq!(bands.width, 0.0);
}

#[test]
fn bands_use_the_last_period_closes_and_population_std() {
    // Closes 1..=25; the last twenty are 6..=25.
    let candles = drifting(0.0, &[(25, 1.0)]);
    let bands = calculate_bollinger_bands(&candles, 20, 2.0).unwrap();

    let std = 33.25_f64.sqrt();
    assert!((bands.middle - 15.5).abs() < 1e-9);
    assert!((bands.upper - (15.5 + 2.0 * std)).abs() < 1e-9);
    assert!((bands.width - (4.0 * std / 15.5 * 100.0)).abs() < 1e-9);
}
