//! Batch scan over a watch list plus new listings

use crate::models::signal::{ScanHit, Signal, UserContext};
use crate::services::market_data::ListingSource;
use crate::signals::assembler::SignalAssembler;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Scanner {
    assembler: Arc<SignalAssembler>,
    listings: Option<Arc<dyn ListingSource>>,
    symbols: Vec<String>,
    min_confidence: f64,
}

impl Scanner {
    pub fn new(
        assembler: Arc<SignalAssembler>,
        listings: Option<Arc<dyn ListingSource>>,
        symbols: Vec<String>,
        min_confidence: f64,
    ) -> Self {
        Self {
            assembler,
            listings,
            symbols,
            min_confidence,
        }
    }

    /// Watch list first, then new listings not already on it.
    pub async fn candidate_symbols(&self) -> Vec<String> {
        let mut symbols = self.symbols.clone();

        if let Some(ref listings) = self.listings {
            match listings.new_listings().await {
                Ok(fresh) => {
                    for symbol in fresh {
                        if !symbols.contains(&symbol) {
                            symbols.push(symbol);
                        }
                    }
                }
                Err(e) => warn!(source = listings.name(), error = %e, "listing fetch failed"),
            }
        }

        symbols
    }

    /// Assembles every candidate in turn and keeps the high-confidence ones.
    pub async fn scan(&self, user: Option<&UserContext>) -> Vec<ScanHit> {
        let symbols = self.candidate_symbols().await;
        let mut signals = Vec::with_capacity(symbols.len());
        for symbol in &symbols {
            signals.push(self.assembler.assemble(symbol, user).await);
        }

        let hits = retain_high_confidence(signals, self.min_confidence);
        info!(scanned = symbols.len(), hits = hits.len(), "scan complete");
        hits
    }
}

pub fn retain_high_confidence(signals: Vec<Signal>, min_confidence: f64) -> Vec<ScanHit> {
    signals
        .into_iter()
        .filter(|s| s.confidence >= min_confidence)
        .map(ScanHit::new)
        .collect()
}
