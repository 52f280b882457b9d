use chatzipt::error::ProviderError;
use chatzipt::models::chat::ChatMessage;
use chatzipt::services::{CompletionRequest, OpenAiClient, TextGenerator};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> CompletionRequest {
    CompletionRequest {
        model: "gpt-4".to_string(),
        messages: vec![ChatMessage::user("Explain BTC")],
        max_tokens: 150,
        temperature: 0.7,
    }
}

fn client(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(format!("{}/v1", server.uri()), "sk-test", 5)
}

#[tokio::test]
async fn completion_content_is_trimmed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4",
            "max_tokens": 150,
            "messages": [{"role": "user", "content": "Explain BTC"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "  Bullish divergence.  "}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server).complete(&request()).await.unwrap();
    assert_eq!(text, "Bullish divergence.");
}

#[tokio::test]
async fn missing_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client(&server).complete(&request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Malformed { provider: "openai", .. }));
}

#[tokio::test]
async fn unauthorized_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "bad key"}})))
        .mount(&server)
        .await;

    let err = client(&server).complete(&request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 401, .. }));
}

#[test]
fn client_needs_a_key() {
    let config = chatzipt::Config::default();
    assert!(OpenAiClient::from_config(&config).is_none());

    let config = chatzipt::Config {
        openai_api_key: Some("sk".to_string()),
        ..chatzipt::Config::default()
    };
    assert!(OpenAiClient::from_config(&config).is_some());
}
