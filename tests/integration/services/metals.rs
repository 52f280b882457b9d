use chatzipt::error::ProviderError;
use chatzipt::services::{CandleSource, MetalsClient, PriceSource};
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, key: Option<&str>) -> MetalsClient {
    MetalsClient::with_client(server.uri(), key.map(String::from), reqwest::Client::new())
}

#[tokio::test]
async fn gold_price_is_the_inverse_rate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/latest"))
        .and(query_param("api_key", "metals-key"))
        .and(query_param("base", "USD"))
        .and(query_param("currencies", "XAU"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "base": "USD",
            "rates": {"XAU": 0.000432}
        })))
        .mount(&server)
        .await;

    let metals = client(&server, Some("metals-key"));
    assert!(metals.supports("XAUUSD"));
    assert!(!metals.supports("BTC"));
    assert_eq!(metals.fetch_price("XAUUSD").await.unwrap(), 2314.81);
}

#[tokio::test]
async fn error_payload_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": {"statusCode": 101, "message": "Invalid API key"}
        })))
        .mount(&server)
        .await;

    let err = client(&server, Some("bad")).fetch_price("XAUUSD").await.unwrap_err();
    match err {
        ProviderError::Malformed { provider, reason } => {
            assert_eq!(provider, "metals");
            assert_eq!(reason, "Invalid API key");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn zero_rate_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rates": {"XAU": 0}})))
        .mount(&server)
        .await;

    let err = client(&server, Some("k")).fetch_price("XAUUSD").await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidPrice { .. }));
}

#[tokio::test]
async fn missing_key_never_calls_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server, None).fetch_price("XAUUSD").await.unwrap_err();
    assert!(matches!(err, ProviderError::NotConfigured("METALS_API_KEY")));
}

#[tokio::test]
async fn daily_ohlc_reads_the_timeseries_oldest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/timeseries"))
        .and(query_param("api_key", "metals-key"))
        .and(query_param("base", "USD"))
        .and(query_param("currencies", "XAU"))
        .and(query_param("start_date", "2024-03-01"))
        .and(query_param("end_date", "2024-03-03"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "rates": {
                "2024-03-02": {"XAU": {"o": 1985.0, "h": 2030.0, "l": 1980.0, "c": 2020.0}},
                "2024-03-01": {"XAU": {"o": "2010.0", "h": "2015.0", "l": "1985.0", "c": "1990.0"}}
            }
        })))
        .mount(&server)
        .await;

    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
    let bars = client(&server, Some("metals-key"))
        .daily_ohlc(start, end)
        .await
        .unwrap();

    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].open, 2010.0);
    assert_eq!(bars[0].timestamp.date_naive(), start);
    assert_eq!(bars[1].close, 2020.0);
    assert_eq!(bars[1].volume, 0.0);
}

#[tokio::test]
async fn unsuccessful_timeseries_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/timeseries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let err = client(&server, Some("k"))
        .fetch_candles("XAUUSD", "1d", 3)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Malformed { .. }));
}

#[tokio::test]
async fn only_daily_gold_bars_are_served() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let metals = client(&server, Some("k"));
    assert!(metals.fetch_candles("XAUUSD", "1h", 3).await.is_err());
    assert!(metals.fetch_candles("BTCUSDT", "1d", 3).await.is_err());
}
