//! Listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Builds the router with request tracing and a global cap on requests
//!   in flight (excess requests wait for a slot).
//! - Serves until Ctrl-C.
//!
//! Requests share only the (stateless) aggregator; every request runs its
//! own aggregation.

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::routes;
use crate::types::{AppState, SharedAggregator};

/// The full application: routes plus the concurrency cap and tracing.
pub fn app(aggregator: SharedAggregator, max_concurrent_requests: usize) -> Router {
    routes::router(AppState::new(aggregator))
        .layer(GlobalConcurrencyLimitLayer::new(max_concurrent_requests))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve with the given configuration.
pub async fn run(config: Config, aggregator: SharedAggregator) -> Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app(aggregator, config.max_concurrent_requests))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Serve on an already-bound listener until the task is dropped.
pub async fn serve(
    listener: TcpListener,
    max_concurrent_requests: usize,
    aggregator: SharedAggregator,
) -> Result<()> {
    axum::serve(listener, app(aggregator, max_concurrent_requests)).await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Ctrl-C received, shutting down");
    }
}
