//! Signal pipeline: per-window scoring, multi-interval confluence, risk
//! levels, explanations and the assembled signal record, plus the daily
//! gold engulfing setup.

pub mod assembler;
pub mod confluence;
pub mod engulfing;
pub mod explanation;
pub mod risk;
pub mod scan;
pub mod scoring;
pub mod serial;
pub mod voting;

pub use assembler::SignalAssembler;
pub use confluence::ConfluenceAggregator;
pub use engulfing::{
    detect_bullish_engulfing, engulfing_setup, EngulfingDetector, EngulfingSetup,
};
pub use explanation::{explanation_prompt, ExplanationGenerator, EXPLANATION_UNAVAILABLE};
pub use risk::{max_lot, RiskCalculator};
pub use scan::{retain_high_confidence, Scanner};
pub use scoring::{IndicatorScorer, IntervalScore};
pub use serial::{generate_serial, serial_with_code};
pub use voting::plurality;
