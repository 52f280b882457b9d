//! Signal record and the intermediate results that feed it

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional opinion. Serialized as `LONG` / `SHORT` / `HOLD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Long,
    Short,
    Hold,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Long => "LONG",
            Action::Short => "SHORT",
            Action::Hold => "HOLD",
        }
    }

    pub fn is_directional(&self) -> bool {
        !matches!(self, Action::Hold)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One heuristic's vote on the latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorVote {
    pub indicator: String,
    pub action: Action,
}

impl IndicatorVote {
    pub fn new(indicator: impl Into<String>, action: Action) -> Self {
        Self {
            indicator: indicator.into(),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalResult {
    pub interval: String,
    pub action: Action,
    pub confidence: f64,
}

/// Consensus across intervals, with the per-interval breakdown in
/// evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceResult {
    pub action: Action,
    pub confidence: f64,
    pub details: IndexMap<String, IntervalResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskLevels {
    pub stop_loss: Option<f64>,
    pub take_profits: Vec<f64>,
}

/// Caller context used for the derived user fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    #[serde(default)]
    pub aura_points: u32,
    #[serde(default)]
    pub pro_unlock_code_valid: bool,
}

impl UserContext {
    pub const PRO_AURA_THRESHOLD: u32 = 200;

    pub fn pro_unlocked(&self) -> bool {
        self.aura_points >= Self::PRO_AURA_THRESHOLD || self.pro_unlock_code_valid
    }
}

/// Account attributes that bound daily position size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraderProfile {
    pub age: Option<u32>,
    /// Energy level: `high`, `medium` or `low`.
    pub vibe: Option<String>,
    /// Tier: `pro`, `plus` or `free`.
    pub subscription: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub vip: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub action: Action,
    pub confidence: f64,
    pub price: Option<f64>,
    pub details: IndexMap<String, IntervalResult>,
    pub explanation: String,
    pub risk: RiskLevels,
    pub serial_number: String,
    pub aura_points: u32,
    pub pro_unlocked: bool,
}

/// Coarse holding horizon attached to scan hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermHorizon {
    #[serde(rename = "long-term")]
    LongTerm,
    #[serde(rename = "short-term")]
    ShortTerm,
    #[serde(rename = "hold")]
    Hold,
}

impl From<Action> for TermHorizon {
    fn from(action: Action) -> Self {
        match action {
            Action::Long => TermHorizon::LongTerm,
            Action::Short => TermHorizon::ShortTerm,
            Action::Hold => TermHorizon::Hold,
        }
    }
}

/// A signal that passed the scan confidence filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanHit {
    #[serde(flatten)]
    pub signal: Signal,
    pub trend: TermHorizon,
}

impl ScanHit {
    pub fn new(signal: Signal) -> Self {
        let trend = TermHorizon::from(signal.action);
        Self { signal, trend }
    }
}
