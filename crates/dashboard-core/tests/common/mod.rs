// crates/dashboard-core/tests/common/mod.rs
//
// Scripted broker + artifact fixtures shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashboard_core::{
    AccountSnapshot, BrokerConnector, BrokerSession, Credentials, DashboardError, DashboardPaths,
    MarketClock, Position, Result,
};

#[derive(Debug, Clone, Default)]
pub struct MockBroker {
    pub prices: HashMap<String, f64>,
    pub failing_symbols: Vec<String>,
    pub fail_account: bool,
    pub fail_clock: bool,
    pub fail_positions: bool,
    pub panic_on_clock: bool,
    pub panicking_symbols: Vec<String>,
    pub positions: Vec<Position>,
}

impl MockBroker {
    pub fn with_prices(prices: &[(&str, f64)]) -> Self {
        MockBroker {
            prices: prices.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
            positions: vec![
                Position {
                    symbol: "AAPL".to_string(),
                    qty: 10.0,
                    market_value: 1_800.0,
                },
                Position {
                    symbol: "TSLA".to_string(),
                    qty: 2.0,
                    market_value: 520.0,
                },
            ],
            ..Default::default()
        }
    }

    pub fn failing(mut self, symbol: &str) -> Self {
        self.failing_symbols.push(symbol.to_string());
        self
    }

    pub fn panicking(mut self, symbol: &str) -> Self {
        self.panicking_symbols.push(symbol.to_string());
        self
    }
}

pub fn live_account() -> AccountSnapshot {
    AccountSnapshot {
        cash: 12_345.67,
        portfolio_value: 30_000.0,
        buying_power: 24_691.34,
        positions_count: 0,
        pattern_day_trader: false,
        daytrade_count: 1,
    }
}

pub fn live_clock() -> MarketClock {
    MarketClock {
        is_open: false,
        next_open: "2025-10-29T09:30:00-04:00".to_string(),
    }
}

#[async_trait]
impl BrokerSession for MockBroker {
    async fn get_account(&self) -> Result<AccountSnapshot> {
        if self.fail_account {
            return Err(DashboardError::BrokerUnavailable(
                "account endpoint returned 503".to_string(),
            ));
        }
        Ok(live_account())
    }

    async fn get_clock(&self) -> Result<MarketClock> {
        if self.panic_on_clock {
            panic!("clock decoder blew up");
        }
        if self.fail_clock {
            return Err(DashboardError::BrokerUnavailable("clock timed out".to_string()));
        }
        Ok(live_clock())
    }

    async fn get_positions(&self) -> Result<Vec<Position>> {
        if self.fail_positions {
            return Err(DashboardError::BrokerUnavailable("positions: 401".to_string()));
        }
        Ok(self.positions.clone())
    }

    async fn get_latest_trade(&self, symbol: &str) -> Result<f64> {
        if self.panicking_symbols.iter().any(|s| s == symbol) {
            panic!("trade decoder blew up on {}", symbol);
        }
        if self.failing_symbols.iter().any(|s| s == symbol) {
            return Err(DashboardError::BrokerUnavailable(format!(
                "no trade for {}",
                symbol
            )));
        }
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| DashboardError::BrokerUnavailable(format!("unknown symbol {}", symbol)))
    }
}

/// Hands out clones of one scripted broker and counts connections.
pub struct MockConnector {
    pub broker: MockBroker,
    pub connects: AtomicUsize,
    pub refuse: bool,
}

impl MockConnector {
    pub fn new(broker: MockBroker) -> Arc<Self> {
        Arc::new(MockConnector {
            broker,
            connects: AtomicUsize::new(0),
            refuse: false,
        })
    }

    pub fn refusing() -> Arc<Self> {
        Arc::new(MockConnector {
            broker: MockBroker::default(),
            connects: AtomicUsize::new(0),
            refuse: true,
        })
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl BrokerConnector for MockConnector {
    fn connect(&self, _credentials: &Credentials) -> Result<Box<dyn BrokerSession>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(DashboardError::BrokerUnavailable("connection refused".to_string()));
        }
        Ok(Box::new(self.broker.clone()))
    }
}

pub const VALID_AUTH: &str =
    r#"{"APCA-API-KEY-ID": "PKTEST123", "APCA-API-SECRET-KEY": "s3cr3t"}"#;

pub const LEDGER_WITH_INDEX: &str = "\
,Time,Type,Ticker,Total
0,2025-10-27 10:31:00,buy,AAPL,1752.50
1,2025-10-27 14:02:00,sell,AAPL,1781.20
2,2025-10-28 09:45:00,buy,TSLA,491.60
";

pub fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(path, contents).expect("write fixture");
}

/// Write a valid auth file and the given symbol list under `paths`.
pub fn write_live_config(paths: &DashboardPaths, symbols: &str) {
    write(&paths.auth_file, VALID_AUTH);
    write(&paths.tickers_file, symbols);
}
