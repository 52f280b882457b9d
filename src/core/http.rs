//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::chat::{vibe_response, ChatSession};
use crate::config::Config;
use crate::metrics::Metrics;
use crate::models::chat::ChatMessage;
use crate::models::signal::{ScanHit, Signal, TraderProfile, UserContext};
use crate::services::{
    BybitClient, ListingSource, MetalsClient, OhlcFetcher, OpenAiClient, PriceFeed, TextGenerator,
};
use crate::signals::{max_lot, EngulfingDetector, EngulfingSetup, Scanner, SignalAssembler};

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub config: Arc<Config>,
    pub price_feed: Arc<PriceFeed>,
    pub assembler: Arc<SignalAssembler>,
    pub scanner: Arc<Scanner>,
    pub engulfing: Arc<EngulfingDetector>,
    pub chat_generator: Option<Arc<dyn TextGenerator>>,
}

impl AppState {
    /// Wire the live upstream clients described by `config`.
    pub fn from_config(config: Arc<Config>, metrics: Arc<Metrics>) -> Self {
        let price_feed = Arc::new(PriceFeed::from_config(&config).with_metrics(metrics.clone()));
        let generator: Option<Arc<dyn TextGenerator>> = OpenAiClient::from_config(&config)
            .map(|client| Arc::new(client) as Arc<dyn TextGenerator>);

        let assembler = Arc::new(
            SignalAssembler::from_config(&config, price_feed.clone(), generator.clone())
                .with_metrics(metrics.clone()),
        );

        let listings: Arc<dyn ListingSource> = Arc::new(BybitClient::new(
            config.bybit_base_url.clone(),
            config.http_timeout_secs,
            config.listing_cutoff_ms,
        ));
        let scanner = Arc::new(Scanner::new(
            assembler.clone(),
            Some(listings),
            config.scan_symbols.clone(),
            config.scan_min_confidence,
        ));

        let daily_gold = Arc::new(MetalsClient::new(
            config.metals_base_url.clone(),
            config.metals_api_key.clone(),
            config.http_timeout_secs,
        ));
        let engulfing = Arc::new(EngulfingDetector::new(
            OhlcFetcher::new(daily_gold).with_metrics(metrics.clone()),
        ));

        Self {
            metrics,
            start_time: Arc::new(Instant::now()),
            config,
            price_feed,
            assembler,
            scanner,
            engulfing,
            chat_generator: generator,
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "service": "chatzipt-signal-engine"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct SignalQuery {
    aura_points: Option<u32>,
    pro_unlock_code_valid: Option<bool>,
}

impl SignalQuery {
    fn user_context(&self) -> Option<UserContext> {
        if self.aura_points.is_none() && self.pro_unlock_code_valid.is_none() {
            return None;
        }
        Some(UserContext {
            aura_points: self.aura_points.unwrap_or(0),
            pro_unlock_code_valid: self.pro_unlock_code_valid.unwrap_or(false),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
struct GuidanceQuery {
    #[serde(default)]
    mood: String,
    age: Option<u32>,
    vibe: Option<String>,
    subscription: Option<String>,
    #[serde(default)]
    is_admin: bool,
    #[serde(default)]
    vip: bool,
}

impl GuidanceQuery {
    fn profile(&self) -> TraderProfile {
        TraderProfile {
            age: self.age,
            vibe: self.vibe.clone(),
            subscription: self.subscription.clone(),
            is_admin: self.is_admin,
            vip: self.vip,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GuidanceResponse {
    pub guidance: String,
    /// `None` when the account is uncapped.
    pub max_lot: Option<f64>,
}

/// Assemble a fresh signal for one symbol
async fn get_signal(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<SignalQuery>,
) -> Result<Json<Signal>, StatusCode> {
    if symbol.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let user = params.user_context();
    let signal = state.assembler.assemble(&symbol, user.as_ref()).await;
    Ok(Json(signal))
}

/// Run the high-confidence scan over the watch list and new listings
async fn run_scan(
    State(state): State<AppState>,
    Query(params): Query<SignalQuery>,
) -> Json<Vec<ScanHit>> {
    let user = params.user_context();
    Json(state.scanner.scan(user.as_ref()).await)
}

/// Current price of each configured health asset
async fn price_health(State(state): State<AppState>) -> Json<IndexMap<String, Option<f64>>> {
    Json(state.price_feed.price_health(&state.config.health_assets).await)
}

/// One chat turn; the caller carries the conversation.
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let mut session = ChatSession::from_config(&state.config, state.chat_generator.clone())
        .with_history(request.history);
    let reply = session.chat(&request.message).await;
    Json(ChatResponse { reply })
}

/// Daily XAUUSD bullish engulfing setup, or `null` when there is none
async fn xau_engulfing(State(state): State<AppState>) -> Json<Option<EngulfingSetup>> {
    Json(state.engulfing.check().await)
}

/// Mood guidance and the daily lot cap for the caller's profile
async fn guidance(Query(query): Query<GuidanceQuery>) -> Json<GuidanceResponse> {
    Json(GuidanceResponse {
        guidance: vibe_response(&query.mood).to_string(),
        max_lot: max_lot(&query.profile()),
    })
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signals/{symbol}", get(get_signal))
        .route("/api/scan", get(run_scan))
        .route("/api/prices/health", get(price_health))
        .route("/api/chat", post(chat))
        .route("/api/patterns/xau-engulfing", get(xau_engulfing))
        .route("/api/guidance", get(guidance))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(config: Arc<Config>) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let port = config.port;

    if !config.is_api_configured() {
        tracing::warn!("OPENAI_API_KEY not set; explanations and chat run in fallback mode");
    }

    let state = AppState::from_config(config, metrics);
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
