use chatzipt::config::ScoringConfig;
use chatzipt::models::signal::Action;
use chatzipt::signals::IndicatorScorer;

use crate::support::{bar, bullish_pair, drifting};

fn scorer() -> IndicatorScorer {
    IndicatorScorer::new(ScoringConfig::default())
}

#[test]
fn short_windows_score_hold_at_half_confidence() {
    let empty = scorer().evaluate(&[]);
    assert_eq!((empty.action, empty.confidence), (Action::Hold, 0.5));
    assert!(empty.votes.is_empty());

    let single = scorer().evaluate(&[bar(0, 100.0, 120.0, 80.0, 110.0, 5.0)]);
    assert_eq!((single.action, single.confidence), (Action::Hold, 0.5));
}

#[test]
fn bullish_pair_votes_long_everywhere() {
    let score = scorer().evaluate(&bullish_pair());

    let votes: Vec<(&str, Action)> = score
        .votes
        .iter()
        .map(|v| (v.indicator.as_str(), v.action))
        .collect();
    assert_eq!(
        votes,
        vec![
            ("smc", Action::Long),
            ("wyckoff", Action::Long),
            ("candle", Action::Long)
        ]
    );
    assert_eq!(score.action, Action::Long);
    assert!((score.confidence - 0.90).abs() < 1e-12);
}

#[test]
fn indicators_are_undefined_on_short_windows() {
    let score = scorer().evaluate(&bullish_pair());
    assert!(score.snapshot.rsi.is_none());
    assert!(score.snapshot.macd.is_none());
    assert!(score.snapshot.bollinger.is_none());
}

#[test]
fn quiet_window_holds_with_base_confidence() {
    let score = scorer().evaluate(&drifting(100.0, &[(5, 0.0)]));
    assert_eq!(score.action, Action::Hold);
    assert!((score.confidence - 0.80).abs() < 1e-12);
}

#[test]
fn single_directional_vote_loses_to_two_holds() {
    // High below close by more than 1%: wick votes SHORT, the rest HOLD.
    let candles = vec![
        bar(0, 100.0, 101.0, 99.0, 100.0, 10.0),
        bar(1, 100.0, 98.0, 95.0, 100.0, 10.0),
    ];
    let score = scorer().evaluate(&candles);
    assert_eq!(score.votes[0].action, Action::Short);
    assert_eq!(score.action, Action::Hold);
}

#[test]
fn three_way_tie_goes_to_the_wick_vote() {
    // wick SHORT, volume LONG, candle HOLD
    let candles = vec![
        bar(0, 100.0, 100.0, 100.0, 100.0, 0.0),
        bar(1, 100.0, 98.0, 95.0, 100.0, 100.0),
    ];
    let score = scorer().evaluate(&candles);
    let actions: Vec<Action> = score.votes.iter().map(|v| v.action).collect();
    assert_eq!(actions, vec![Action::Short, Action::Long, Action::Hold]);
    assert_eq!(score.action, Action::Short);
    assert!((score.confidence - 0.90).abs() < 1e-12);
}

#[test]
fn oversold_with_rising_macd_forces_long() {
    let candles = drifting(500.0, &[(60, -2.0), (20, -0.1)]);
    let score = scorer().evaluate(&candles);

    let rsi = score.snapshot.rsi.as_ref().unwrap().value;
    let macd = score.snapshot.macd.as_ref().unwrap();
    assert!(rsi < 30.0);
    assert!(macd.macd > macd.signal);

    assert_eq!(score.action, Action::Long);
    assert!((score.confidence - 0.85).abs() < 1e-9);
}

#[test]
fn overbought_with_falling_macd_forces_short() {
    let candles = drifting(100.0, &[(60, 2.0), (20, 0.1)]);
    let score = scorer().evaluate(&candles);
    assert_eq!(score.action, Action::Short);
    assert!((score.confidence - 0.85).abs() < 1e-9);
}

#[test]
fn confidence_is_capped() {
    let config = ScoringConfig {
        override_bonus: 0.5,
        ..ScoringConfig::default()
    };
    let candles = drifting(500.0, &[(60, -2.0), (20, -0.1)]);
    let score = IndicatorScorer::new(config).evaluate(&candles);
    assert_eq!(score.action, Action::Long);
    assert_eq!(score.confidence, 0.99);
}

#[test]
fn scoring_is_idempotent() {
    let candles = drifting(500.0, &[(60, -2.0), (20, -0.1)]);
    let scorer = scorer();
    let first = scorer.evaluate(&candles);
    let second = scorer.evaluate(&candles);
    assert_eq!(first.action, second.action);
    assert_eq!(first.confidence, second.confidence);
}
