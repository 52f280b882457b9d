use std::sync::Arc;

use chatzipt::models::chat::Role;
use chatzipt::models::signal::Action;
use chatzipt::services::TextGenerator;
use chatzipt::signals::{explanation_prompt, ExplanationGenerator, EXPLANATION_UNAVAILABLE};

use crate::support::FakeGenerator;

#[test]
fn prompt_names_asset_price_signal_and_percent() {
    let prompt = explanation_prompt("BTC", Action::Long, Some(65000.5), 0.9);
    assert!(prompt.starts_with("Asset: BTC, Price: 65000.5, Signal: LONG, Confidence: 90%.\n"));
    assert!(prompt.contains("multi-timeframe, SMC, Wyckoff, and candle analysis"));
}

#[test]
fn whole_prices_keep_their_decimal_point() {
    let prompt = explanation_prompt("BTC", Action::Short, Some(65000.0), 0.85);
    assert!(prompt.starts_with("Asset: BTC, Price: 65000.0, Signal: SHORT, Confidence: 85%.\n"));
}

#[test]
fn prompt_marks_missing_price() {
    let prompt = explanation_prompt("XAUUSD", Action::Hold, None, 0.5);
    assert!(prompt.contains("Price: unavailable"));
    assert!(prompt.contains("Confidence: 50%"));
}

#[tokio::test]
async fn missing_generator_yields_sentinel() {
    let explainer = ExplanationGenerator::new(None, "gpt-4");
    let text = explainer.explain("BTC", Action::Long, Some(1.0), 0.9).await;
    assert_eq!(text, EXPLANATION_UNAVAILABLE);
}

#[tokio::test]
async fn upstream_failure_yields_sentinel() {
    let generator: Arc<dyn TextGenerator> = Arc::new(FakeGenerator::failing());
    let explainer = ExplanationGenerator::new(Some(generator), "gpt-4");
    let text = explainer.explain("BTC", Action::Short, None, 0.8).await;
    assert_eq!(text, "AI explanation unavailable.");
}

#[tokio::test]
async fn empty_reply_yields_sentinel() {
    let generator: Arc<dyn TextGenerator> = Arc::new(FakeGenerator::replying("   "));
    let explainer = ExplanationGenerator::new(Some(generator), "gpt-4");
    let text = explainer.explain("BTC", Action::Short, None, 0.8).await;
    assert_eq!(text, EXPLANATION_UNAVAILABLE);
}

#[tokio::test]
async fn successful_reply_is_returned_with_fixed_request_settings() {
    let fake = Arc::new(FakeGenerator::replying("Momentum is turning up."));
    let generator: Arc<dyn TextGenerator> = fake.clone();
    let explainer = ExplanationGenerator::new(Some(generator), "gpt-4");

    let text = explainer.explain("ETH", Action::Long, Some(3000.0), 0.95).await;
    assert_eq!(text, "Momentum is turning up.");

    let request = fake.last_request().unwrap();
    assert_eq!(request.model, "gpt-4");
    assert_eq!(request.max_tokens, 150);
    assert_eq!(request.temperature, 0.7);
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0].role, Role::User);
    assert!(request.messages[0].content.contains("Confidence: 95%"));
}
