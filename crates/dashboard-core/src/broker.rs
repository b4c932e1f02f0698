//! Broker capability consumed by the aggregator.
//!
//! The core never talks to a broker directly. It is handed a
//! [`BrokerConnector`] and asks it for a fresh [`BrokerSession`] on every
//! live request. Implementations are expected to bound their own calls with
//! a timeout; the core adds none.

use async_trait::async_trait;

use crate::config_gate::Credentials;
use crate::error::Result;
use crate::snapshot::{AccountSnapshot, MarketClock, Position};

/// Read-only view of a brokerage account.
///
/// Every method may fail with `DashboardError::BrokerUnavailable`, and the
/// caller treats each call as independently failable.
#[async_trait]
pub trait BrokerSession: Send + Sync {
    /// Account figures. `positions_count` is filled in by the aggregator
    /// from [`get_positions`](Self::get_positions).
    async fn get_account(&self) -> Result<AccountSnapshot>;

    async fn get_clock(&self) -> Result<MarketClock>;

    async fn get_positions(&self) -> Result<Vec<Position>>;

    /// Price of the most recent trade in `symbol`.
    async fn get_latest_trade(&self, symbol: &str) -> Result<f64>;
}

/// Builds a session from validated credentials.
pub trait BrokerConnector: Send + Sync {
    fn connect(&self, credentials: &Credentials) -> Result<Box<dyn BrokerSession>>;
}
