//! The aggregate root handed to renderers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mode::{BotPhase, OperatingMode};
use crate::policy;
use crate::snapshot::{AccountSnapshot, MarketClock, TickerQuote, TradeRecord};

/// Complete status for one request.
///
/// Built in one step by [`StatusAggregator`](crate::StatusAggregator) and
/// never modified afterwards; every request gets a new one.
///
/// - `Demo`: account and clock are the fixed demo values, every quote has
///   `resolved == false`.
/// - `Error`: demo account and clock, no tickers, no trades, and `error`
///   holds the diagnostic message.
/// - `Live`: fetched data; per-symbol fallbacks are visible through
///   `TickerQuote::resolved`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub mode: OperatingMode,
    pub timestamp: DateTime<Utc>,
    pub clock: MarketClock,
    pub account: AccountSnapshot,
    pub tickers: Vec<TickerQuote>,
    /// Most recent ledger rows, oldest first.
    pub trades: Vec<TradeRecord>,
    /// Number of rows in the whole ledger, not just `trades`.
    pub total_trades: usize,
    pub bot_phase: BotPhase,
    pub error: Option<String>,
}

impl DashboardState {
    /// Synthetic state used when config artifacts are missing.
    pub fn demo(timestamp: DateTime<Utc>, tickers: Vec<TickerQuote>) -> Self {
        DashboardState {
            mode: OperatingMode::Demo,
            timestamp,
            clock: policy::demo_clock(),
            account: policy::demo_account(),
            tickers,
            trades: Vec::new(),
            total_trades: 0,
            bot_phase: BotPhase::Demo,
            error: None,
        }
    }

    /// Minimal payload used when the live path failed.
    pub fn error_fallback(timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        DashboardState {
            mode: OperatingMode::Error,
            timestamp,
            clock: policy::demo_clock(),
            account: policy::demo_account(),
            tickers: Vec::new(),
            trades: Vec::new(),
            total_trades: 0,
            bot_phase: BotPhase::Demo,
            error: Some(message.into()),
        }
    }

    pub fn first_trade_made(&self) -> bool {
        self.bot_phase.first_trade_made()
    }

    /// The last `n` trades (or fewer), oldest first.
    pub fn latest_trades(&self, n: usize) -> &[TradeRecord] {
        let start = self.trades.len().saturating_sub(n);
        &self.trades[start..]
    }
}
