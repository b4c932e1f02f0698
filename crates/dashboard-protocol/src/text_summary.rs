// crates/dashboard-protocol/src/text_summary.rs

//! Plain-text rendering of a `DashboardState` for humans.
//!
//! Deliberately unstyled: one section per block, aligned `label: value`
//! lines. The mode banner is always the first line so synthetic data can
//! never be mistaken for live data.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use dashboard_core::{DashboardState, OperatingMode, TradeSide};

/// Trades listed in the "Recent Trading History" block.
pub const RECENT_TRADES_IN_SUMMARY: usize = 5;

pub fn render_summary(state: &DashboardState) -> String {
    let mut out = String::with_capacity(1024);

    // Writing into a String cannot fail.
    let _ = write_summary(&mut out, state);
    out
}

fn write_summary(out: &mut String, state: &DashboardState) -> std::fmt::Result {
    writeln!(out, "=== Trading Bot Dashboard [{}] ===", state.mode.as_str())?;
    writeln!(out, "As of: {}", state.timestamp.format("%Y-%m-%d %H:%M:%S UTC"))?;
    match state.mode {
        OperatingMode::Live => {}
        OperatingMode::Demo => {
            writeln!(out, "DEMO MODE - auth files not present, all figures are synthetic")?
        }
        OperatingMode::Error => writeln!(
            out,
            "ERROR - live data unavailable: {}",
            state.error.as_deref().unwrap_or("unknown error")
        )?,
    }
    writeln!(out)?;

    if state.clock.is_open {
        writeln!(out, "Market is OPEN")?;
    } else {
        let next: String = state.clock.next_open.chars().take(16).collect();
        writeln!(out, "Market is CLOSED - next open: {}", next)?;
    }
    writeln!(out)?;

    let account = &state.account;
    writeln!(out, "-- Account --")?;
    writeln!(out, "Cash:            {}", format_currency(account.cash))?;
    writeln!(out, "Portfolio value: {}", format_currency(account.portfolio_value))?;
    writeln!(out, "Buying power:    {}", format_currency(account.buying_power))?;
    writeln!(out, "Open positions:  {}", account.positions_count)?;
    writeln!(out, "Day trades:      {}/3", account.daytrade_count)?;
    writeln!(
        out,
        "PDT flagged:     {}",
        if account.pattern_day_trader { "yes" } else { "no" }
    )?;
    writeln!(out)?;

    writeln!(out, "-- Bot --")?;
    writeln!(out, "Mode:        {}", state.bot_phase.description())?;
    writeln!(
        out,
        "First trade: {}",
        if state.first_trade_made() { "yes" } else { "pending" }
    )?;
    writeln!(out)?;

    writeln!(out, "-- Ticker Prices --")?;
    if state.tickers.is_empty() {
        writeln!(out, "(none)")?;
    }
    for quote in &state.tickers {
        let marker = if quote.resolved { "" } else { " (fallback)" };
        writeln!(out, "{:<6} {}{}", quote.symbol, format_currency(quote.price), marker)?;
    }
    writeln!(out)?;

    let recent = state.latest_trades(RECENT_TRADES_IN_SUMMARY);
    if recent.is_empty() {
        writeln!(out, "-- Trading History --")?;
        writeln!(out, "No trades yet - ready for action")?;
    } else {
        writeln!(out, "-- Recent Trading History ({} total) --", state.total_trades)?;
        for trade in recent {
            let side = match trade.side {
                TradeSide::Buy => "BUY ",
                TradeSide::Sell => "SELL",
            };
            writeln!(
                out,
                "{} - {} {:<6} {}",
                trade.time,
                side,
                trade.ticker,
                format_currency(trade.total)
            )?;
        }
    }

    Ok(())
}

/// Body of the `/health` endpoint.
pub fn render_health(now: DateTime<Utc>) -> String {
    format!(
        "OK - trading dashboard healthy\nTime: {}\n",
        now.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// `$1,234.50` style formatting; negatives as `-$1,234.50`.
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, frac)
}
