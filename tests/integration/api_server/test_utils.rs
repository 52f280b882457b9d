use std::sync::Arc;

use axum_test::TestServer;
use chatzipt::config::Config;
use chatzipt::core::http::{create_router, AppState};
use chatzipt::metrics::Metrics;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper structure bundling together the HTTP server and mocked upstreams.
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub upstream: MockServer,
}

impl TestApiServer {
    pub async fn new() -> Self {
        Self::build(None).await
    }

    pub async fn with_openai_key() -> Self {
        Self::build(Some("sk-test")).await
    }

    async fn build(openai_key: Option<&str>) -> Self {
        let upstream = MockServer::start().await;
        mock_binance(&upstream).await;
        mock_bybit_listings(&upstream).await;
        mock_metals(&upstream).await;
        mock_openai(&upstream).await;

        let config = Arc::new(test_config(&upstream, openai_key));
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let state = AppState::from_config(config, metrics.clone());

        let router = create_router(state);
        let server = TestServer::new(router).expect("start test server");

        Self {
            server,
            metrics,
            upstream,
        }
    }
}

pub fn test_config(upstream: &MockServer, openai_key: Option<&str>) -> Config {
    Config {
        openai_api_key: openai_key.map(String::from),
        openai_base_url: format!("{}/v1", upstream.uri()),
        binance_base_url: upstream.uri(),
        bybit_base_url: upstream.uri(),
        metals_base_url: upstream.uri(),
        metals_api_key: Some("metals-key".to_string()),
        http_timeout_secs: 5,
        generation_timeout_secs: 5,
        health_assets: vec!["XAUUSD".to_string(), "BTC".to_string()],
        ..Config::default()
    }
}

/// Every symbol trades at 110 with a two-bar bullish window on every interval.
pub async fn mock_binance(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"price": "110.00"})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [1700000000000_i64, "100", "100", "90", "90", "0", 1700003599999_i64, "0", 0, "0", "0", "0"],
            [1700003600000_i64, "90", "115", "88", "110", "1000", 1700007199999_i64, "0", 10, "0", "0", "0"]
        ])))
        .mount(server)
        .await;
}

pub async fn mock_bybit_listings(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v5/market/tickers"))
        .and(query_param("category", "spot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"list": [{"symbol": "NEWUSDT", "listTime": "1700000000000"}]}
        })))
        .mount(server)
        .await;
}

/// Gold at 2000, with a bullish engulfing pair on the daily timeseries.
pub async fn mock_metals(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rates": {"XAU": 0.0005}})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/timeseries"))
        .and(query_param("currencies", "XAU"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "rates": {
                "2024-03-02": {"XAU": {"o": 1985.0, "h": 2030.0, "l": 1980.0, "c": 2020.0}},
                "2024-03-01": {"XAU": {"o": 2010.0, "h": 2015.0, "l": 1985.0, "c": 1990.0}}
            }
        })))
        .mount(server)
        .await;
}

pub async fn mock_openai(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Mocked reply."}}]
        })))
        .mount(server)
        .await;
}
