//! Per-request value types assembled into a `DashboardState`.
//!
//! All of these are plain immutable data: they are produced fresh on each
//! request and never updated in place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Account figures as reported by the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub cash: f64,
    pub portfolio_value: f64,
    pub buying_power: f64,
    pub positions_count: usize,
    pub pattern_day_trader: bool,
    /// Day trades used in the rolling window (0..=3 for a non-PDT account).
    pub daytrade_count: u32,
}

/// Market clock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketClock {
    pub is_open: bool,
    /// Next open, kept verbatim as the broker formats it.
    pub next_open: String,
}

/// An open position. Only counted by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub qty: f64,
    pub market_value: f64,
}

/// Price for one requested symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerQuote {
    pub symbol: String,
    pub price: f64,
    /// `true` if the price came from a live fetch, `false` for a fallback.
    pub resolved: bool,
}

impl TickerQuote {
    pub fn live(symbol: &str, price: f64) -> Self {
        TickerQuote {
            symbol: symbol.to_string(),
            price,
            resolved: true,
        }
    }

    pub fn fallback(symbol: &str, price: f64) -> Self {
        TickerQuote {
            symbol: symbol.to_string(),
            price,
            resolved: false,
        }
    }
}

/// Direction of a ledger trade.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeSide {
    type Err = DashboardError;

    /// Case-insensitive: the bot has written both `buy` and `BUY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(TradeSide::Buy),
            "sell" => Ok(TradeSide::Sell),
            other => Err(DashboardError::LedgerReadFailed(format!(
                "unknown trade type `{}`",
                other
            ))),
        }
    }
}

/// One executed trade from the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub time: String,
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub ticker: String,
    pub total: f64,
}
