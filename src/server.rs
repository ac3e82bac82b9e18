use crate::badge::{BadgeQuery, BadgeService};
use crate::error::{BadgeError, Result};
use crate::health::health_routes;
use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Application state shared by every route
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BadgeService>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: BadgeService) -> Self {
        Self {
            service: Arc::new(service),
            start_time: Instant::now(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(top_repos))
        .route("/api/top-repos", get(top_repos))
        .merge(health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the badge routes until `shutdown` resolves
pub async fn start_server<F>(
    state: AppState,
    addr: &str,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Badge server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

fn plain_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)],
        message,
    )
        .into_response()
}

/// The badge itself
async fn top_repos(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let query = BadgeQuery::parse(raw.as_deref());
    let request = state.service.request_from_query(&query);

    match state.service.render_badge(&request).await {
        Ok(svg) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, SVG_CONTENT_TYPE),
                (
                    header::CACHE_CONTROL,
                    state.service.config().cache_control.as_str(),
                ),
            ],
            svg,
        )
            .into_response(),
        Err(BadgeError::MissingConfig(name)) => {
            error!(missing = %name, "Badge requested without configuration");
            plain_error(format!("Missing {}", name))
        }
        Err(e) => {
            error!(username = %request.username, error = %e, "Failed to build badge");
            plain_error("Internal error".to_string())
        }
    }
}
