//! Shared data models spanning the engine layers.

pub mod chat;
pub mod indicators;
pub mod signal;

pub use chat::{ChatEntry, ChatMessage, Role};
pub use indicators::{BollingerIndicator, Candle, IndicatorSnapshot, MacdIndicator, RsiIndicator};
pub use signal::{
    Action, ConfluenceResult, IndicatorVote, IntervalResult, RiskLevels, ScanHit, Signal,
    TermHorizon, UserContext,
};
