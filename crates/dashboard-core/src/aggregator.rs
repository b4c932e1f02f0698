//! Status aggregation and degradation policy.
//!
//! One call to [`StatusAggregator::aggregate`] is one pass through:
//!
//! ```text
//! Start -> ConfigChecked -+-> (missing config) ---------------------> Assembled [DEMO]
//!                         |
//!                         +-> LiveAttempt -+-> LiveSucceeded -------> Assembled [LIVE]
//!                                          +-> LiveFailed ----------> Assembled [ERROR]
//! ```
//!
//! There is no retry and no state kept between passes; concurrent requests
//! simply repeat the upstream fetches.

use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use tracing::{error, info};

use crate::broker::BrokerConnector;
use crate::config_gate::{ConfigurationGate, Credentials, GateOutcome};
use crate::error::{DashboardError, Result};
use crate::ledger::TradeLedgerReader;
use crate::mode::{BotPhase, OperatingMode};
use crate::policy::{self, MAX_RECENT_TRADES};
use crate::snapshot::AccountSnapshot;
use crate::state::DashboardState;
use crate::ticker_resolver::TickerPriceResolver;

/// Locations of the external artifacts the dashboard reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardPaths {
    pub auth_file: PathBuf,
    pub tickers_file: PathBuf,
    pub ledger_file: PathBuf,
    /// Existence-only flag written by the bot after its first trade.
    pub marker_file: PathBuf,
}

impl Default for DashboardPaths {
    fn default() -> Self {
        DashboardPaths {
            auth_file: PathBuf::from("AUTH/auth.txt"),
            tickers_file: PathBuf::from("TICKERS/my_tickers.txt"),
            ledger_file: PathBuf::from("Orders.csv"),
            marker_file: PathBuf::from("FirstTrade.csv"),
        }
    }
}

impl DashboardPaths {
    /// All artifacts resolved relative to `dir`, using the default names.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let defaults = DashboardPaths::default();
        DashboardPaths {
            auth_file: dir.join(defaults.auth_file),
            tickers_file: dir.join(defaults.tickers_file),
            ledger_file: dir.join(defaults.ledger_file),
            marker_file: dir.join(defaults.marker_file),
        }
    }
}

/// Builds a [`DashboardState`] per request.
///
/// Holds only paths and capabilities, so one instance can be shared across
/// concurrent requests.
pub struct StatusAggregator {
    gate: ConfigurationGate,
    ledger: TradeLedgerReader,
    marker_file: PathBuf,
    resolver: TickerPriceResolver,
    connector: Arc<dyn BrokerConnector>,
}

impl StatusAggregator {
    pub fn new(paths: DashboardPaths, connector: Arc<dyn BrokerConnector>) -> Self {
        StatusAggregator {
            gate: ConfigurationGate::new(paths.auth_file, paths.tickers_file),
            ledger: TradeLedgerReader::new(paths.ledger_file),
            marker_file: paths.marker_file,
            resolver: TickerPriceResolver::default(),
            connector,
        }
    }

    /// Replace the default ticker resolver (e.g. a different symbol cap).
    pub fn with_resolver(mut self, resolver: TickerPriceResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn gate(&self) -> &ConfigurationGate {
        &self.gate
    }

    /// Aggregate, stamped with the current time.
    pub async fn aggregate(&self) -> DashboardState {
        self.aggregate_at(Utc::now()).await
    }

    /// Aggregate with an explicit timestamp. Never fails: every outcome is
    /// a tagged `DashboardState`.
    pub async fn aggregate_at(&self, timestamp: DateTime<Utc>) -> DashboardState {
        match self.gate.resolve_mode() {
            GateOutcome::MissingConfig(reason) => {
                info!(%reason, "config not available, serving demo data");
                self.assemble_demo(timestamp).await
            }
            GateOutcome::LiveCapable(credentials) => {
                // A panicking broker implementation is still just a failed
                // live attempt.
                let attempt = AssertUnwindSafe(self.attempt_live(&credentials, timestamp))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        Err(DashboardError::UnexpectedAggregationFailure(
                            "live aggregation panicked".to_string(),
                        ))
                    });

                match attempt {
                    Ok(state) => state,
                    Err(err) => {
                        error!(%err, "live status unavailable, serving error fallback");
                        DashboardState::error_fallback(timestamp, err.to_string())
                    }
                }
            }
        }
    }

    async fn assemble_demo(&self, timestamp: DateTime<Utc>) -> DashboardState {
        let symbols = policy::default_symbols();
        let tickers = self.resolver.resolve(&symbols, None, true).await;
        DashboardState::demo(timestamp, tickers)
    }

    async fn attempt_live(
        &self,
        credentials: &Credentials,
        timestamp: DateTime<Utc>,
    ) -> Result<DashboardState> {
        let session = self.connector.connect(credentials)?;

        let account = session.get_account().await?;
        let clock = session.get_clock().await?;
        let positions = session.get_positions().await?;
        let symbols = self.gate.read_symbols()?;

        let tickers = self
            .resolver
            .resolve(&symbols, Some(session.as_ref()), false)
            .await;
        let ledger = self.ledger.read_window(MAX_RECENT_TRADES);
        let bot_phase = BotPhase::from_marker(self.marker_file.exists());

        info!(
            symbols = symbols.len(),
            positions = positions.len(),
            trades = ledger.total_rows,
            ?bot_phase,
            "assembled live status"
        );

        Ok(DashboardState {
            mode: OperatingMode::Live,
            timestamp,
            clock,
            account: AccountSnapshot {
                positions_count: positions.len(),
                ..account
            },
            tickers,
            trades: ledger.records,
            total_trades: ledger.total_rows,
            bot_phase,
            error: None,
        })
    }
}
