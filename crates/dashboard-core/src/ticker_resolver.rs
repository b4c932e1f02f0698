//! Per-symbol price lookup with local fallback.
//!
//! The resolver never fails: a symbol whose live lookup errors (or panics)
//! gets the demo/synthetic price with `resolved == false`, and its siblings are
//! unaffected. Output order always matches input order.

use std::panic::AssertUnwindSafe;

use futures::future::join_all;
use futures::FutureExt;
use tracing::{debug, warn};

use crate::broker::BrokerSession;
use crate::error::DashboardError;
use crate::policy::{self, MAX_TICKERS};
use crate::snapshot::TickerQuote;

#[derive(Debug, Clone, Copy)]
pub struct TickerPriceResolver {
    max_tickers: usize,
}

impl Default for TickerPriceResolver {
    fn default() -> Self {
        TickerPriceResolver {
            max_tickers: MAX_TICKERS,
        }
    }
}

impl TickerPriceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with a non-default cap on symbols per request.
    pub fn with_limit(max_tickers: usize) -> Self {
        TickerPriceResolver { max_tickers }
    }

    pub fn max_tickers(&self) -> usize {
        self.max_tickers
    }

    /// Quote the first `max_tickers` of `symbols`.
    ///
    /// With `demo == true` or no session every quote is a fallback.
    /// Otherwise the lookups run concurrently; `join_all` keeps them in
    /// input order.
    pub async fn resolve(
        &self,
        symbols: &[String],
        session: Option<&dyn BrokerSession>,
        demo: bool,
    ) -> Vec<TickerQuote> {
        let capped = &symbols[..symbols.len().min(self.max_tickers)];

        match session {
            Some(session) if !demo => {
                join_all(capped.iter().map(|symbol| resolve_isolated(session, symbol))).await
            }
            _ => capped.iter().map(|symbol| fallback_quote(symbol)).collect(),
        }
    }
}

// A panicking lookup is one more failed symbol, not a failed request.
async fn resolve_isolated(session: &dyn BrokerSession, symbol: &str) -> TickerQuote {
    match AssertUnwindSafe(resolve_live(session, symbol))
        .catch_unwind()
        .await
    {
        Ok(quote) => quote,
        Err(_) => {
            warn!(symbol, "price lookup panicked, using fallback price");
            fallback_quote(symbol)
        }
    }
}

async fn resolve_live(session: &dyn BrokerSession, symbol: &str) -> TickerQuote {
    match session.get_latest_trade(symbol).await {
        Ok(price) if price.is_finite() && price > 0.0 => {
            debug!(symbol, price, "resolved live price");
            TickerQuote::live(symbol, price)
        }
        Ok(price) => {
            let failure = DashboardError::TickerFetchFailed {
                symbol: symbol.to_string(),
                reason: format!("unusable price {}", price),
            };
            warn!(%failure, "using fallback price");
            fallback_quote(symbol)
        }
        Err(err) => {
            let failure = DashboardError::TickerFetchFailed {
                symbol: symbol.to_string(),
                reason: err.to_string(),
            };
            warn!(%failure, "using fallback price");
            fallback_quote(symbol)
        }
    }
}

fn fallback_quote(symbol: &str) -> TickerQuote {
    TickerQuote::fallback(symbol, policy::fallback_price(symbol))
}
