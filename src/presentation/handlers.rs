// HTTP request handlers
use crate::domain::dashboard::DashboardSkeleton;
use crate::infrastructure::chunked_json::stream_response;
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::HeaderMap,
    response::Response,
    Json,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Dashboard layout: tiles, series, capacity and cadence
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSkeleton> {
    Json(state.skeleton.clone())
}

/// Attach the caller as the rendering surface and stream frames to it.
/// A newer viewer replaces this one.
pub async fn stream_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    // Check if client accepts Brotli compression
    let compress = headers
        .get("accept-encoding")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.contains("br"))
        .unwrap_or(false);

    let rx = state
        .surface
        .attach(state.skeleton.clone(), state.viewer_buffer);
    stream_response(rx, compress)
}
