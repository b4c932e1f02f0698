//! Operating mode and bot phase tags carried by every `DashboardState`.

use serde::{Deserialize, Serialize};

/// Where the data in a `DashboardState` came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatingMode {
    /// Real data from the broker and ledger.
    Live,
    /// Config artifacts absent or malformed; synthetic data.
    Demo,
    /// Config present but a mandatory live call failed.
    Error,
}

impl OperatingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            OperatingMode::Live => "LIVE",
            OperatingMode::Demo => "DEMO",
            OperatingMode::Error => "ERROR",
        }
    }

    pub fn is_live(self) -> bool {
        self == OperatingMode::Live
    }
}

/// Analysis cadence the trading bot is currently running at.
///
/// The bot analyses every 30 minutes until it has placed its first trade
/// (signalled by the marker artifact), then drops to a 1-minute cadence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotPhase {
    FirstAnalysis,
    SteadyAnalysis,
    Demo,
}

impl BotPhase {
    /// Phase implied by whether the first-trade marker exists.
    pub fn from_marker(first_trade_made: bool) -> Self {
        if first_trade_made {
            BotPhase::SteadyAnalysis
        } else {
            BotPhase::FirstAnalysis
        }
    }

    pub fn first_trade_made(self) -> bool {
        self == BotPhase::SteadyAnalysis
    }

    /// Human-readable label used by the renderers.
    pub fn description(self) -> &'static str {
        match self {
            BotPhase::FirstAnalysis => "30-minute analysis (first trade)",
            BotPhase::SteadyAnalysis => "1-minute analysis",
            BotPhase::Demo => "DEMO MODE - Live API Not Connected",
        }
    }
}
