//! Configuration for the dashboard server.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults,
//! 2. an optional TOML file (`--config`),
//! 3. environment variables,
//! 4. command-line flags (applied in `main`).
//!
//! Environment variables:
//!
//! - `DASHBOARD_BIND_ADDR`                (default: "0.0.0.0")
//! - `PORT`                               (default: "8080")
//! - `DASHBOARD_MAX_CONCURRENT_REQUESTS`  (default: "256")
//! - `DASHBOARD_AUTH_FILE`                (default: "AUTH/auth.txt")
//! - `DASHBOARD_TICKERS_FILE`             (default: "TICKERS/my_tickers.txt")
//! - `DASHBOARD_LEDGER_FILE`              (default: "Orders.csv")
//! - `DASHBOARD_MARKER_FILE`              (default: "FirstTrade.csv")
//! - `DASHBOARD_BROKER_URL`               (default: Alpaca paper trading API)
//! - `DASHBOARD_DATA_URL`                 (default: Alpaca market data API)
//! - `DASHBOARD_BROKER_TIMEOUT_SECS`      (default: "10")

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use dashboard_core::DashboardPaths;
use serde::Deserialize;

use crate::alpaca::{DEFAULT_DATA_URL, DEFAULT_TRADING_URL};

/// Server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Requests handled at once; further requests wait for a slot.
    pub max_concurrent_requests: usize,

    /// Where the credential, symbol, ledger and marker artifacts live.
    pub paths: DashboardPaths,

    /// Broker trading API base URL (account, clock, positions).
    pub broker_url: String,

    /// Market data API base URL (latest trades).
    pub data_url: String,

    /// Per-call timeout for broker requests.
    pub broker_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            max_concurrent_requests: 256,
            paths: DashboardPaths::default(),
            broker_url: DEFAULT_TRADING_URL.to_string(),
            data_url: DEFAULT_DATA_URL.to_string(),
            broker_timeout: Duration::from_secs(10),
        }
    }
}

/// Optional TOML overrides. Every field may be omitted.
///
/// ```toml
/// port = 9090
/// broker_timeout_secs = 5
///
/// [paths]
/// ledger_file = "/var/lib/bot/Orders.csv"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub bind_addr: Option<String>,
    pub port: Option<u16>,
    pub max_concurrent_requests: Option<usize>,
    pub broker_url: Option<String>,
    pub data_url: Option<String>,
    pub broker_timeout_secs: Option<u64>,
    pub paths: FilePaths,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilePaths {
    pub auth_file: Option<PathBuf>,
    pub tickers_file: Option<PathBuf>,
    pub ledger_file: Option<PathBuf>,
    pub marker_file: Option<PathBuf>,
}

impl Config {
    /// Build the configuration from defaults, an optional TOML file, and
    /// the variables `lookup` knows about, in that order.
    pub fn load<F>(file: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(path) = file {
            config.apply_file(Self::load_file(path)?);
        }
        config.apply_env(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.max_concurrent_requests > 0,
            "max_concurrent_requests must be at least 1"
        );
        Ok(())
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        Self::load(None, |key| std::env::var(key).ok())
    }

    pub fn load_file(path: &Path) -> Result<FileConfig> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse_file(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse_file(raw: &str) -> Result<FileConfig> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_file(&mut self, file: FileConfig) {
        if let Some(v) = file.bind_addr {
            self.bind_addr = v;
        }
        if let Some(v) = file.port {
            self.port = v;
        }
        if let Some(v) = file.max_concurrent_requests {
            self.max_concurrent_requests = v;
        }
        if let Some(v) = file.broker_url {
            self.broker_url = v;
        }
        if let Some(v) = file.data_url {
            self.data_url = v;
        }
        if let Some(secs) = file.broker_timeout_secs {
            self.broker_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = file.paths.auth_file {
            self.paths.auth_file = v;
        }
        if let Some(v) = file.paths.tickers_file {
            self.paths.tickers_file = v;
        }
        if let Some(v) = file.paths.ledger_file {
            self.paths.ledger_file = v;
        }
        if let Some(v) = file.paths.marker_file {
            self.paths.marker_file = v;
        }
    }

    /// Apply every variable that `lookup` knows about.
    pub fn apply_env<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DASHBOARD_BIND_ADDR") {
            self.bind_addr = v;
        }
        self.port = read_or(lookup, "PORT", self.port)?;
        self.max_concurrent_requests = read_or(
            lookup,
            "DASHBOARD_MAX_CONCURRENT_REQUESTS",
            self.max_concurrent_requests,
        )?;

        if let Some(v) = lookup("DASHBOARD_AUTH_FILE") {
            self.paths.auth_file = v.into();
        }
        if let Some(v) = lookup("DASHBOARD_TICKERS_FILE") {
            self.paths.tickers_file = v.into();
        }
        if let Some(v) = lookup("DASHBOARD_LEDGER_FILE") {
            self.paths.ledger_file = v.into();
        }
        if let Some(v) = lookup("DASHBOARD_MARKER_FILE") {
            self.paths.marker_file = v.into();
        }

        if let Some(v) = lookup("DASHBOARD_BROKER_URL") {
            self.broker_url = v;
        }
        if let Some(v) = lookup("DASHBOARD_DATA_URL") {
            self.data_url = v;
        }
        let timeout_secs = read_or(
            lookup,
            "DASHBOARD_BROKER_TIMEOUT_SECS",
            self.broker_timeout.as_secs(),
        )?;
        self.broker_timeout = Duration::from_secs(timeout_secs);

        Ok(())
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_or<F, T>(lookup: &F, key: &str, current: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {}: {:?}", key, val)),
        None => Ok(current),
    }
}
