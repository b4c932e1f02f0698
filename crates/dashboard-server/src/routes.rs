//! HTTP routes.
//!
//! - `/`, `/dashboard` : plain-text dashboard
//! - `/health`         : liveness text
//! - `/api/status`     : JSON status object, readable from any origin
//!
//! Every route except `/health` runs one full aggregation; nothing is cached.
//! Known paths answer GET and HEAD only (405 otherwise); unknown paths get a
//! 404 with a hint.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use dashboard_protocol::{encode_status, render_health, render_summary};
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::types::AppState;

pub const NOT_FOUND_BODY: &str = "Page not found. Try / (dashboard), /health, or /api/status\n";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/dashboard", get(dashboard))
        .route("/health", get(health))
        .route("/api/status", get(api_status).layer(CorsLayer::permissive()))
        .fallback(not_found)
        .with_state(state)
}

async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.aggregator.aggregate().await;
    ([(header::CACHE_CONTROL, "no-store")], render_summary(&status))
}

async fn health() -> String {
    render_health(Utc::now())
}

async fn api_status(State(state): State<AppState>) -> Response {
    let status = state.aggregator.aggregate().await;
    match encode_status(&status) {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::CACHE_CONTROL, "no-store"),
            ],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(%err, "failed to encode status");
            (StatusCode::INTERNAL_SERVER_ERROR, "status encoding failed\n").into_response()
        }
    }
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}
