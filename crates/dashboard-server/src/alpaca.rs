//! Alpaca REST implementation of the broker capability.
//!
//! Endpoints used:
//!
//! ```text
//! GET {trading}/v2/account
//! GET {trading}/v2/clock
//! GET {trading}/v2/positions
//! GET {data}/v2/stocks/{symbol}/trades/latest
//! ```
//!
//! Every transport, HTTP status, or decode failure is reported as
//! `DashboardError::BrokerUnavailable`. Calls are bounded by the client
//! timeout configured on the connector.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use dashboard_core::config_gate::{API_KEY_ID_FIELD, API_SECRET_KEY_FIELD};
use dashboard_core::{
    AccountSnapshot, BrokerConnector, BrokerSession, Credentials, DashboardError, MarketClock,
    Position, Result,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;

pub const DEFAULT_TRADING_URL: &str = "https://paper-api.alpaca.markets";
pub const DEFAULT_DATA_URL: &str = "https://data.alpaca.markets";

/// Creates one [`AlpacaSession`] per request.
#[derive(Debug, Clone)]
pub struct AlpacaConnector {
    trading_url: String,
    data_url: String,
    timeout: Duration,
}

impl AlpacaConnector {
    pub fn new(trading_url: impl Into<String>, data_url: impl Into<String>, timeout: Duration) -> Self {
        AlpacaConnector {
            trading_url: trading_url.into(),
            data_url: data_url.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.broker_url, &config.data_url, config.broker_timeout)
    }
}

impl BrokerConnector for AlpacaConnector {
    fn connect(&self, credentials: &Credentials) -> Result<Box<dyn BrokerSession>> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header_name(API_KEY_ID_FIELD)?,
            HeaderValue::from_str(&credentials.key_id).map_err(unavailable)?,
        );
        let mut secret = HeaderValue::from_str(&credentials.secret_key).map_err(unavailable)?;
        secret.set_sensitive(true);
        headers.insert(header_name(API_SECRET_KEY_FIELD)?, secret);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()
            .map_err(unavailable)?;

        Ok(Box::new(AlpacaSession {
            client,
            trading_url: self.trading_url.clone(),
            data_url: self.data_url.clone(),
        }))
    }
}

pub struct AlpacaSession {
    client: Client,
    trading_url: String,
    data_url: String,
}

impl AlpacaSession {
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "broker request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?;
        response.json::<T>().await.map_err(unavailable)
    }
}

#[async_trait]
impl BrokerSession for AlpacaSession {
    async fn get_account(&self) -> Result<AccountSnapshot> {
        let url = endpoint(&self.trading_url, &["v2", "account"])?;
        let account: wire::Account = self.get_json(url).await?;
        account.into_snapshot()
    }

    async fn get_clock(&self) -> Result<MarketClock> {
        let url = endpoint(&self.trading_url, &["v2", "clock"])?;
        let clock: wire::Clock = self.get_json(url).await?;
        Ok(clock.into_clock())
    }

    async fn get_positions(&self) -> Result<Vec<Position>> {
        let url = endpoint(&self.trading_url, &["v2", "positions"])?;
        let positions: Vec<wire::Position> = self.get_json(url).await?;
        positions.into_iter().map(wire::Position::into_position).collect()
    }

    async fn get_latest_trade(&self, symbol: &str) -> Result<f64> {
        let url = endpoint(&self.data_url, &["v2", "stocks", symbol, "trades", "latest"])?;
        let latest: wire::LatestTrade = self.get_json(url).await?;
        Ok(latest.trade.price)
    }
}

/// `base` with `segments` appended as percent-encoded path segments.
pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base).map_err(unavailable)?;
    url.path_segments_mut()
        .map_err(|_| DashboardError::BrokerUnavailable(format!("unusable base url {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(unavailable)
}

fn unavailable(err: impl fmt::Display) -> DashboardError {
    DashboardError::BrokerUnavailable(err.to_string())
}

/// Response bodies as Alpaca sends them. Money fields arrive as decimal
/// strings.
pub mod wire {
    use serde::Deserialize;

    use dashboard_core::{AccountSnapshot, DashboardError, MarketClock, Result};

    #[derive(Debug, Deserialize)]
    pub struct Account {
        pub cash: String,
        pub portfolio_value: String,
        pub buying_power: String,
        #[serde(default)]
        pub pattern_day_trader: bool,
        #[serde(default)]
        pub daytrade_count: u32,
    }

    impl Account {
        pub fn into_snapshot(self) -> Result<AccountSnapshot> {
            Ok(AccountSnapshot {
                cash: parse_amount("cash", &self.cash)?,
                portfolio_value: parse_amount("portfolio_value", &self.portfolio_value)?,
                buying_power: parse_amount("buying_power", &self.buying_power)?,
                positions_count: 0,
                pattern_day_trader: self.pattern_day_trader,
                daytrade_count: self.daytrade_count,
            })
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct Clock {
        pub is_open: bool,
        pub next_open: String,
    }

    impl Clock {
        pub fn into_clock(self) -> MarketClock {
            MarketClock {
                is_open: self.is_open,
                next_open: self.next_open,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct Position {
        pub symbol: String,
        pub qty: String,
        #[serde(default)]
        pub market_value: Option<String>,
    }

    impl Position {
        pub fn into_position(self) -> Result<dashboard_core::Position> {
            let market_value = match self.market_value.as_deref() {
                Some(raw) => parse_amount("market_value", raw)?,
                None => 0.0,
            };
            Ok(dashboard_core::Position {
                qty: parse_amount("qty", &self.qty)?,
                symbol: self.symbol,
                market_value,
            })
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct LatestTrade {
        pub trade: Trade,
    }

    #[derive(Debug, Deserialize)]
    pub struct Trade {
        #[serde(rename = "p")]
        pub price: f64,
    }

    pub fn parse_amount(field: &str, raw: &str) -> Result<f64> {
        raw.trim().parse::<f64>().map_err(|_| {
            DashboardError::BrokerUnavailable(format!("{} is not a number: {:?}", field, raw))
        })
    }
}
