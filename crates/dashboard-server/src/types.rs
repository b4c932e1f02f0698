//! Shared types for the dashboard HTTP server.

use std::sync::Arc;

use dashboard_core::StatusAggregator;

/// The aggregator holds no per-request state, so one instance serves all
/// requests.
pub type SharedAggregator = Arc<StatusAggregator>;

/// Handler state, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: SharedAggregator,
}

impl AppState {
    pub fn new(aggregator: SharedAggregator) -> Self {
        AppState { aggregator }
    }
}
