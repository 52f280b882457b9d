//! Natural-language rationale for a signal

use crate::models::chat::ChatMessage;
use crate::models::signal::Action;
use crate::services::openai::{CompletionRequest, TextGenerator};
use std::sync::Arc;
use tracing::warn;

pub const EXPLANATION_UNAVAILABLE: &str = "AI explanation unavailable.";

const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f64 = 0.7;

pub fn explanation_prompt(symbol: &str, action: Action, price: Option<f64>, confidence: f64) -> String {
    let price = price.map_or_else(|| "unavailable".to_string(), |p| format!("{:?}", p));
    let percent = (confidence * 100.0).trunc() as i64;
    format!(
        "Asset: {symbol}, Price: {price}, Signal: {action}, Confidence: {percent}%.\n\
         Explain in plain English the technical and AI logic behind this signal, \
         referencing multi-timeframe, SMC, Wyckoff, and candle analysis. \
         Keep it concise but informative for traders."
    )
}

pub struct ExplanationGenerator {
    generator: Option<Arc<dyn TextGenerator>>,
    model: String,
}

impl ExplanationGenerator {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    /// Never fails: a missing generator, an upstream error or an empty
    /// reply all yield [`EXPLANATION_UNAVAILABLE`].
    pub async fn explain(
        &self,
        symbol: &str,
        action: Action,
        price: Option<f64>,
        confidence: f64,
    ) -> String {
        let generator = match &self.generator {
            Some(generator) => generator,
            None => return EXPLANATION_UNAVAILABLE.to_string(),
        };

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(explanation_prompt(
                symbol, action, price, confidence,
            ))],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        match generator.complete(&request).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(symbol, "explanation came back empty");
                EXPLANATION_UNAVAILABLE.to_string()
            }
            Err(e) => {
                warn!(symbol, error = %e, "explanation generation failed");
                EXPLANATION_UNAVAILABLE.to_string()
            }
        }
    }
}
