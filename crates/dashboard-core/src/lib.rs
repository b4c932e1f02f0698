//! dashboard-core
//!
//! Status aggregation for the trading bot dashboard:
//! - data model (account, clock, quotes, trades, `DashboardState`)
//! - broker capability traits
//! - config gate, ticker price resolver, trade ledger reader
//! - the aggregator that applies the LIVE / DEMO / ERROR policy

pub mod error;
pub mod mode;
pub mod snapshot;
pub mod policy;
pub mod state;
pub mod broker;
pub mod config_gate;
pub mod ticker_resolver;
pub mod ledger;
pub mod aggregator;

pub use error::{DashboardError, Result};
pub use mode::{BotPhase, OperatingMode};

pub use snapshot::{
    AccountSnapshot,
    MarketClock,
    Position,
    TickerQuote,
    TradeRecord,
    TradeSide,
};

pub use state::DashboardState;
pub use broker::{BrokerConnector, BrokerSession};
pub use config_gate::{ConfigurationGate, Credentials, GateOutcome};
pub use ticker_resolver::TickerPriceResolver;
pub use ledger::{LedgerWindow, TradeLedgerReader};
pub use aggregator::{DashboardPaths, StatusAggregator};
