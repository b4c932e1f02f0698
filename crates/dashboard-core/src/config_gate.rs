//! Decides whether a request may attempt the live path.
//!
//! Two artifacts are involved:
//! - the credential descriptor, a JSON object with the string fields
//!   `APCA-API-KEY-ID` and `APCA-API-SECRET-KEY`;
//! - the symbol list, whitespace-separated tickers.
//!
//! Absence or malformed content is a normal outcome here, reported as
//! [`GateOutcome::MissingConfig`], never as an error.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DashboardError, Result};

pub const API_KEY_ID_FIELD: &str = "APCA-API-KEY-ID";
pub const API_SECRET_KEY_FIELD: &str = "APCA-API-SECRET-KEY";

/// Broker API credentials read from the credential descriptor.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key_id: String,
    pub secret_key: String,
}

// Keep the secret out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct CredentialDescriptor {
    #[serde(rename = "APCA-API-KEY-ID")]
    key_id: String,
    #[serde(rename = "APCA-API-SECRET-KEY")]
    secret_key: String,
}

/// Result of [`ConfigurationGate::resolve_mode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    LiveCapable(Credentials),
    /// Carries `ConfigMissing` or `ConfigMalformed` for logging.
    MissingConfig(DashboardError),
}

/// Existence/parse check over the two config artifacts.
#[derive(Debug, Clone)]
pub struct ConfigurationGate {
    auth_file: PathBuf,
    tickers_file: PathBuf,
}

impl ConfigurationGate {
    pub fn new(auth_file: impl Into<PathBuf>, tickers_file: impl Into<PathBuf>) -> Self {
        ConfigurationGate {
            auth_file: auth_file.into(),
            tickers_file: tickers_file.into(),
        }
    }

    pub fn auth_file(&self) -> &Path {
        &self.auth_file
    }

    pub fn tickers_file(&self) -> &Path {
        &self.tickers_file
    }

    pub fn resolve_mode(&self) -> GateOutcome {
        match self.check() {
            Ok(credentials) => GateOutcome::LiveCapable(credentials),
            Err(reason) => GateOutcome::MissingConfig(reason),
        }
    }

    fn check(&self) -> Result<Credentials> {
        if !self.tickers_file.is_file() {
            return Err(DashboardError::ConfigMissing(
                self.tickers_file.display().to_string(),
            ));
        }

        let raw = fs::read_to_string(&self.auth_file).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => {
                DashboardError::ConfigMissing(self.auth_file.display().to_string())
            }
            _ => DashboardError::ConfigMalformed(format!(
                "{}: {}",
                self.auth_file.display(),
                err
            )),
        })?;

        parse_credentials(&raw)
    }

    /// Read the configured symbols. Only called once the gate has passed,
    /// so a failure here is unexpected and aborts the live path.
    pub fn read_symbols(&self) -> Result<Vec<String>> {
        let raw = fs::read_to_string(&self.tickers_file).map_err(|err| {
            DashboardError::UnexpectedAggregationFailure(format!(
                "reading symbol list {}: {}",
                self.tickers_file.display(),
                err
            ))
        })?;
        Ok(parse_symbol_list(&raw))
    }
}

/// Parse the credential descriptor. Extra fields are ignored.
pub fn parse_credentials(raw: &str) -> Result<Credentials> {
    let descriptor: CredentialDescriptor = serde_json::from_str(raw)
        .map_err(|err| DashboardError::ConfigMalformed(format!("credentials: {}", err)))?;

    Ok(Credentials {
        key_id: descriptor.key_id,
        secret_key: descriptor.secret_key,
    })
}

/// Split a symbol list on any whitespace and upper-case each token.
/// Repeats are dropped; the first occurrence keeps its position.
pub fn parse_symbol_list(raw: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for token in raw.split_whitespace() {
        let symbol = token.to_ascii_uppercase();
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}
