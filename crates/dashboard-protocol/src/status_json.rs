// crates/dashboard-protocol/src/status_json.rs

//! JSON status object for machine consumers (`/api/status`).
//!
//! Shape:
//!
//! ```text
//! {
//!   "mode": "LIVE" | "DEMO" | "ERROR",
//!   "status": "...",
//!   "timestamp": RFC 3339,
//!   "market_open": bool,
//!   "next_open": string,
//!   "account": { cash, portfolio_value, buying_power, positions_count,
//!                pattern_day_trader, daytrade_count },
//!   "bot": { first_trade_made, phase, description },
//!   "tickers": { SYMBOL: price, ... },          // input order
//!   "quotes": [ { symbol, price, resolved } ],
//!   "trading": { total_trades, recent_trades: [ { time, type, ticker, total } ] },
//!   "message": string,                          // DEMO / ERROR only
//!   "error": string                             // ERROR only
//! }
//! ```

use dashboard_core::{
    AccountSnapshot, BotPhase, DashboardState, OperatingMode, TickerQuote, TradeRecord,
};
use indexmap::IndexMap;
use serde::Serialize;

/// Trades listed under `trading.recent_trades`.
pub const RECENT_TRADES_IN_STATUS: usize = 5;

pub const DEMO_MESSAGE: &str = "Auth files not present - serving demo data";
pub const ERROR_MESSAGE: &str = "Unable to fetch bot status - falling back to demo mode";

#[derive(Debug, Serialize)]
pub struct StatusDocument<'a> {
    pub mode: OperatingMode,
    pub status: &'static str,
    pub timestamp: String,
    pub market_open: bool,
    pub next_open: &'a str,
    pub account: &'a AccountSnapshot,
    pub bot: BotSection,
    pub tickers: IndexMap<&'a str, f64>,
    pub quotes: &'a [TickerQuote],
    pub trading: TradingSection<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct BotSection {
    pub first_trade_made: bool,
    pub phase: BotPhase,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TradingSection<'a> {
    pub total_trades: usize,
    pub recent_trades: &'a [TradeRecord],
}

/// Borrowing view of `state` in the JSON status layout.
pub fn status_document(state: &DashboardState) -> StatusDocument<'_> {
    let (status, message) = match state.mode {
        OperatingMode::Live => ("Live", None),
        OperatingMode::Demo => ("Demo Mode Active", Some(DEMO_MESSAGE)),
        OperatingMode::Error => ("Error", Some(ERROR_MESSAGE)),
    };

    StatusDocument {
        mode: state.mode,
        status,
        timestamp: state.timestamp.to_rfc3339(),
        market_open: state.clock.is_open,
        next_open: &state.clock.next_open,
        account: &state.account,
        bot: BotSection {
            first_trade_made: state.first_trade_made(),
            phase: state.bot_phase,
            description: state.bot_phase.description(),
        },
        tickers: state
            .tickers
            .iter()
            .map(|quote| (quote.symbol.as_str(), quote.price))
            .collect(),
        quotes: &state.tickers,
        trading: TradingSection {
            total_trades: state.total_trades,
            recent_trades: state.latest_trades(RECENT_TRADES_IN_STATUS),
        },
        message,
        error: state.error.as_deref(),
    }
}

/// Pretty-printed JSON status.
pub fn encode_status(state: &DashboardState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&status_document(state))
}
