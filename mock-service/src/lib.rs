//! In-process stand-in for the logging service, used by the end to end tests.
use axum::{
    debug_handler,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::{
    num::NonZeroU32,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, RwLock,
    },
    time::Duration,
};
use tower_http::trace::TraceLayer;
use tracing::debug;

pub const SESSION_COOKIE: &str = "logsys-session";
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub username: String,
    pub password: String,
    pub api_key: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            username: "bench".to_string(),
            password: "bench".to_string(),
            api_key: "test-api-key".to_string(),
        }
    }
}

/// Requests seen per route family.
#[derive(Debug, Default)]
pub struct Hits {
    pub login: AtomicU64,
    pub read: AtomicU64,
    pub write: AtomicU64,
    pub other: AtomicU64,
}

impl Hits {
    fn bump(counter: &AtomicU64, route: &'static str) {
        counter.fetch_add(1, Ordering::Relaxed);
        counter!("mock-service.requests", "route" => route).increment(1);
    }
}

#[derive(Clone)]
struct AppState {
    config: Arc<MockConfig>,
    session_token: Arc<str>,
    hits: Arc<Hits>,
    limiters: Arc<RwLock<HashMap<u32, Arc<DefaultDirectRateLimiter>>>>,
}

/// Handle on a running mock server.
pub struct MockService {
    pub addr: SocketAddr,
    hits: Arc<Hits>,
}

impl MockService {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn login_hits(&self) -> u64 {
        self.hits.login.load(Ordering::Relaxed)
    }

    pub fn read_hits(&self) -> u64 {
        self.hits.read.load(Ordering::Relaxed)
    }

    pub fn write_hits(&self) -> u64 {
        self.hits.write.load(Ordering::Relaxed)
    }

    pub fn other_hits(&self) -> u64 {
        self.hits.other.load(Ordering::Relaxed)
    }
}

/// Bind `addr` and serve in the background.
pub async fn serve(addr: SocketAddr, config: MockConfig) -> std::io::Result<MockService> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;
    let hits = Arc::new(Hits::default());
    let app = router(config, hits.clone());

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!("Mock service stopped: {err}");
        }
    });

    Ok(MockService { addr, hits })
}

/// Serve on an ephemeral localhost port.
pub async fn spawn(config: MockConfig) -> std::io::Result<MockService> {
    serve(SocketAddr::from(([127, 0, 0, 1], 0)), config).await
}

fn router(config: MockConfig, hits: Arc<Hits>) -> Router {
    let state = AppState {
        config: Arc::new(config),
        session_token: uuid::Uuid::new_v4().to_string().into(),
        hits,
        limiters: Arc::new(RwLock::new(HashMap::new())),
    };

    Router::new()
        .route("/api/auth/login", post(login))
        .route(
            "/api/projects/:project_id/logs/aggregated",
            get(aggregated_logs),
        )
        .route(
            "/api/projects/:project_id/logs",
            get(query_logs).post(ingest),
        )
        .route("/delay/ms/:delay_ms", get(delay))
        .route("/status/:code", get(status))
        .route("/limited/:max_tps", get(limited))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[debug_handler]
async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    Hits::bump(&state.hits.login, "login");

    if req.username != state.config.username || req.password != state.config.password {
        debug!("Rejected login for {}", req.username);
        return (StatusCode::UNAUTHORIZED, "Invalid credentials").into_response();
    }

    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly",
        state.session_token
    );
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({ "username": req.username })),
    )
        .into_response()
}

fn has_session(state: &AppState, headers: &HeaderMap) -> bool {
    let expected = format!("{SESSION_COOKIE}={}", state.session_token);
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .any(|pair| pair.trim() == expected)
}

#[derive(Serialize)]
struct AggregatedLog {
    event_name: String,
    total_count: u64,
    last_seen: String,
}

async fn aggregated_logs(
    State(state): State<AppState>,
    Path(_project_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<AggregatedLog>>, StatusCode> {
    Hits::bump(&state.hits.read, "read");
    if !has_session(&state, &headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(Json(
        (1..=5)
            .map(|i| AggregatedLog {
                event_name: format!("event_{i}"),
                total_count: 100 * i,
                last_seen: "2025-07-20T21:09:00Z".to_string(),
            })
            .collect(),
    ))
}

async fn query_logs(
    State(state): State<AppState>,
    Path(_project_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, StatusCode> {
    Hits::bump(&state.hits.read, "read");
    if !has_session(&state, &headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(Json(serde_json::json!({
        "logs": [],
        "filters": params,
    })))
}

/// Shape the ingestion endpoint accepts. Anything else is rejected by the extractor.
#[derive(Deserialize)]
#[allow(unused)]
struct IngestRequest {
    name: String,
    timestamp: String,
    searchable_keys: BTreeMap<String, String>,
    full_payload: serde_json::Value,
}

async fn ingest(
    State(state): State<AppState>,
    Path(_project_id): Path<String>,
    headers: HeaderMap,
    Json(_event): Json<IngestRequest>,
) -> Response {
    Hits::bump(&state.hits.write, "write");

    let authorized = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|key| key == state.config.api_key);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "Invalid API Key for this project").into_response();
    }

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "status": "log accepted" })),
    )
        .into_response()
}

async fn delay(State(state): State<AppState>, Path(delay_ms): Path<u64>) {
    Hits::bump(&state.hits.other, "delay");
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}

async fn status(State(state): State<AppState>, Path(code): Path<u16>) -> StatusCode {
    Hits::bump(&state.hits.other, "status");
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serves at most `max_tps` requests per second, rejecting the rest with a 503.
async fn limited(
    State(state): State<AppState>,
    Path(max_tps): Path<u32>,
) -> Result<(), StatusCode> {
    Hits::bump(&state.hits.other, "limited");

    let max_tps = NonZeroU32::new(max_tps).ok_or(StatusCode::BAD_REQUEST)?;
    let existing = state
        .limiters
        .read()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .get(&max_tps.get())
        .cloned();
    let limiter = match existing {
        Some(limiter) => limiter,
        None => state
            .limiters
            .write()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .entry(max_tps.get())
            .or_insert_with(|| Arc::new(rate_limiter(max_tps)))
            .clone(),
    };

    limiter
        .check()
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)
}

pub fn rate_limiter(tps: NonZeroU32) -> DefaultDirectRateLimiter {
    RateLimiter::direct(Quota::per_second(tps))
}

/** TPS Printer **/

/// Print the number of requests served each second.
pub async fn tps_measure_task(service: Arc<MockService>) {
    let mut last = 0;
    loop {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let current = service.login_hits()
            + service.read_hits()
            + service.write_hits()
            + service.other_hits();
        println!("{} TPS", current - last);
        last = current;
    }
}
