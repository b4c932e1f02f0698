//! dashboard-server
//!
//! Async HTTP front end for the trading bot status dashboard, plus the
//! Alpaca REST broker session it aggregates from.

pub mod config;
pub mod types;
pub mod routes;
pub mod server;
pub mod alpaca;
