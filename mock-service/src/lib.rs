use axum::{
    debug_handler,
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Behaviour of the mock target.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Status returned by `GET /health`.
    pub health_status: u16,
    /// `(email, password)` pairs accepted by `POST /api/auth/login`.
    pub accounts: Vec<(String, String)>,
    pub token: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            health_status: 200,
            accounts: vec![("bench@volley.test".to_string(), "volley".to_string())],
            token: "mock-service-token".to_string(),
        }
    }
}

/// Handle to a mock service listening on a local port.
#[derive(Clone)]
pub struct MockService {
    pub addr: SocketAddr,
    state: Arc<ServerState>,
}

impl MockService {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests served by the workload endpoints (everything except health and login).
    pub fn hits(&self) -> u64 {
        self.state.hits.load(Ordering::Relaxed)
    }

    pub fn logins(&self) -> u64 {
        self.state.logins.load(Ordering::Relaxed)
    }
}

struct ServerState {
    config: MockConfig,
    hits: AtomicU64,
    logins: AtomicU64,
}

fn router(config: MockConfig) -> (Router, Arc<ServerState>) {
    let state = Arc::new(ServerState {
        config,
        hits: AtomicU64::new(0),
        logins: AtomicU64::new(0),
    });

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/delay/ms/:delay_ms", get(delay))
        .route("/status/:status", get(status).post(status))
        .route("/protected", get(protected))
        .route("/echo", post(echo))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    (app, state)
}

pub async fn run(addr: SocketAddr, config: MockConfig) -> anyhow::Result<()> {
    let (app, _) = router(config);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Bind an ephemeral loopback port and serve in the background.
pub async fn spawn(config: MockConfig) -> anyhow::Result<MockService> {
    let (app, state) = router(config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!("Mock service stopped: {err}");
        }
    });

    debug!("Mock service listening on {addr}");
    Ok(MockService { addr, state })
}

#[debug_handler]
async fn health(State(state): State<Arc<ServerState>>) -> StatusCode {
    StatusCode::from_u16(state.config.health_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    email: String,
}

#[debug_handler]
async fn login(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, StatusCode> {
    state.logins.fetch_add(1, Ordering::Relaxed);

    let known = state
        .config
        .accounts
        .iter()
        .any(|(email, password)| *email == req.email && *password == req.password);

    if known {
        Ok(Json(LoginResponse {
            token: state.config.token.clone(),
            email: req.email,
        }))
    } else {
        debug!("Rejected login for {}", req.email);
        Err(StatusCode::UNAUTHORIZED)
    }
}

#[debug_handler]
async fn delay(State(state): State<Arc<ServerState>>, Path(delay_ms): Path<u64>) {
    state.hits.fetch_add(1, Ordering::Relaxed);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}

#[debug_handler]
async fn status(State(state): State<Arc<ServerState>>, Path(status): Path<u16>) -> StatusCode {
    state.hits.fetch_add(1, Ordering::Relaxed);
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST)
}

#[debug_handler]
async fn protected(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> StatusCode {
    state.hits.fetch_add(1, Ordering::Relaxed);
    let expected = format!("Bearer {}", state.config.token);
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => StatusCode::OK,
        _ => StatusCode::UNAUTHORIZED,
    }
}

#[debug_handler]
async fn echo(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    state.hits.fetch_add(1, Ordering::Relaxed);
    Json(body)
}
