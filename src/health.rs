use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

/// Health check status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub token_configured: bool,
}

/// Liveness probe response (minimal, just indicates the process is running)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

/// Readiness probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check)) // Kubernetes convention
        .route("/livez", get(liveness_check)) // Kubernetes liveness probe
        .route("/readyz", get(readiness_check)) // Kubernetes readiness probe
}

/// Main health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let token_configured = state.service.has_token();

    // Without a token every badge request fails, but the process itself is fine
    let status = if token_configured {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        token_configured,
    };

    (StatusCode::OK, Json(response))
}

/// Kubernetes liveness probe - just checks if the process is alive
async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(LivenessResponse {
            status: "alive".to_string(),
        }),
    )
}

/// Kubernetes readiness probe - ready once a GitHub token is configured
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.service.has_token();

    let response = ReadinessResponse {
        ready,
        message: if ready {
            None
        } else {
            Some("Not ready - GITHUB_TOKEN is not configured".to_string())
        },
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
