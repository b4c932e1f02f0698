//! Error types for the status aggregation core.
//!
//! Only two of these ever reach the aggregator boundary
//! (`BrokerUnavailable` and `UnexpectedAggregationFailure`); the rest are
//! degraded to a fallback value inside the component that raised them.
//! `aggregate` itself is infallible.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// A config artifact does not exist. Not a failure: triggers DEMO.
    #[error("config artifact missing: {0}")]
    ConfigMissing(String),

    /// The credential artifact exists but cannot be interpreted.
    /// Handled exactly like `ConfigMissing`.
    #[error("config artifact malformed: {0}")]
    ConfigMalformed(String),

    /// Network, auth, or service failure on any broker call.
    #[error("broker unavailable: {0}")]
    BrokerUnavailable(String),

    /// Latest-trade lookup failed for a single symbol.
    #[error("price fetch failed for {symbol}: {reason}")]
    TickerFetchFailed { symbol: String, reason: String },

    /// The trade ledger exists but could not be read or parsed.
    #[error("trade ledger read failed: {0}")]
    LedgerReadFailed(String),

    /// Catch-all for anything else that breaks the live path.
    #[error("aggregation failed: {0}")]
    UnexpectedAggregationFailure(String),
}

impl DashboardError {
    /// `true` for the two outcomes that select DEMO mode.
    pub fn is_config_issue(&self) -> bool {
        matches!(
            self,
            DashboardError::ConfigMissing(_) | DashboardError::ConfigMalformed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
