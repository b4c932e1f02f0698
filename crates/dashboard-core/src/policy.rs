//! Named policy constants and the synthetic values used outside LIVE mode.
//!
//! Everything the dashboard shows when it cannot (or may not) talk to the
//! broker comes from here, so DEMO and ERROR payloads are reproducible.

use crate::snapshot::{AccountSnapshot, MarketClock};

/// Only the first `MAX_TICKERS` configured symbols are priced per request.
pub const MAX_TICKERS: usize = 4;

/// Number of most recent ledger rows kept in a `DashboardState`.
pub const MAX_RECENT_TRADES: usize = 10;

/// Symbols shown in DEMO mode.
pub const DEFAULT_SYMBOLS: [&str; 4] = ["AAPL", "TSLA", "AMZN", "MA"];

/// Fixed prices for the demo symbols.
pub const DEMO_PRICES: [(&str, f64); 4] = [
    ("AAPL", 175.25),
    ("TSLA", 245.80),
    ("AMZN", 135.90),
    ("MA", 425.60),
];

/// Synthetic prices for unknown symbols fall in
/// `[SYNTHETIC_BASE_PRICE, SYNTHETIC_BASE_PRICE + SYNTHETIC_PRICE_SPAN)`.
pub const SYNTHETIC_BASE_PRICE: f64 = 100.0;
pub const SYNTHETIC_PRICE_SPAN: u32 = 50;

pub const DEMO_CASH: f64 = 25_000.0;
pub const DEMO_PORTFOLIO_VALUE: f64 = 25_000.0;
pub const DEMO_BUYING_POWER: f64 = 50_000.0;
pub const DEMO_NEXT_OPEN: &str = "2025-10-28 09:30:00-04:00";

pub fn default_symbols() -> Vec<String> {
    DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
}

pub fn demo_price(symbol: &str) -> Option<f64> {
    DEMO_PRICES
        .iter()
        .find(|(known, _)| *known == symbol)
        .map(|(_, price)| *price)
}

/// Price used whenever a live quote is not available for `symbol`.
pub fn fallback_price(symbol: &str) -> f64 {
    demo_price(symbol).unwrap_or_else(|| synthetic_price(symbol))
}

/// Deterministic pseudo-price for a symbol missing from `DEMO_PRICES`.
pub fn synthetic_price(symbol: &str) -> f64 {
    SYNTHETIC_BASE_PRICE + (symbol_checksum(symbol) % SYNTHETIC_PRICE_SPAN) as f64
}

// Polynomial rolling checksum over the symbol bytes. Must stay stable across
// builds and platforms.
fn symbol_checksum(symbol: &str) -> u32 {
    symbol
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32))
}

pub fn demo_account() -> AccountSnapshot {
    AccountSnapshot {
        cash: DEMO_CASH,
        portfolio_value: DEMO_PORTFOLIO_VALUE,
        buying_power: DEMO_BUYING_POWER,
        positions_count: 0,
        pattern_day_trader: false,
        daytrade_count: 0,
    }
}

pub fn demo_clock() -> MarketClock {
    MarketClock {
        is_open: true,
        next_open: DEMO_NEXT_OPEN.to_string(),
    }
}
