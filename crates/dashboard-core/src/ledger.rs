//! Reader for the bot's CSV trade ledger.
//!
//! Ledger format (one header row, appended to by the bot):
//!
//! ```text
//! ,Time,Type,Ticker,Total
//! 0,2025-10-27 10:31:00,buy,AAPL,1752.50
//! 1,2025-10-27 14:02:00,sell,AAPL,1781.20
//! ```
//!
//! - A leading unlabeled index column (empty header, or `Unnamed: N` when
//!   the file went through a dataframe round-trip) is dropped before any
//!   field is interpreted.
//! - Columns other than `Time`, `Type`, `Ticker`, `Total` are ignored.
//! - A row with a missing or unparsable cell is skipped with a warning. It
//!   still counts towards the ledger's row total.
//! - A missing file is an empty ledger. An unreadable file, or a header
//!   without the required columns, is reported as empty by
//!   [`TradeLedgerReader::read_window`]; use [`TradeLedgerReader::load`] to
//!   see the failure.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{DashboardError, Result};
use crate::snapshot::{TradeRecord, TradeSide};

/// Columns every ledger header must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["Time", "Type", "Ticker", "Total"];

/// Tail of the ledger plus the total row count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerWindow {
    pub total_rows: usize,
    /// At most `max_count` rows, in ledger order.
    pub records: Vec<TradeRecord>,
}

#[derive(Debug, Deserialize)]
struct LedgerRow {
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Ticker")]
    ticker: String,
    #[serde(rename = "Total")]
    total: f64,
}

impl LedgerRow {
    fn into_record(self) -> Result<TradeRecord> {
        Ok(TradeRecord {
            side: self.kind.parse::<TradeSide>()?,
            time: self.time,
            ticker: self.ticker,
            total: self.total,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TradeLedgerReader {
    path: PathBuf,
}

impl TradeLedgerReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TradeLedgerReader { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last `max_count` trades, oldest first. Never fails.
    pub fn read_recent(&self, max_count: usize) -> Vec<TradeRecord> {
        self.read_window(max_count).records
    }

    /// Like [`read_recent`](Self::read_recent) but also reports the total
    /// number of ledger rows. Read failures are logged and swallowed.
    pub fn read_window(&self, max_count: usize) -> LedgerWindow {
        match self.load(max_count) {
            Ok(window) => window,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring unreadable trade ledger");
                LedgerWindow::default()
            }
        }
    }

    /// Fallible read. A missing file is `Ok` with an empty window.
    pub fn load(&self, max_count: usize) -> Result<LedgerWindow> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no trade ledger yet");
                return Ok(LedgerWindow::default());
            }
            Err(err) => return Err(ledger_error(err)),
        };

        parse_ledger(file, max_count)
    }
}

/// Parse ledger CSV from any reader, keeping the last `max_count` rows.
pub fn parse_ledger<R: Read>(reader: R, max_count: usize) -> Result<LedgerWindow> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let raw_headers = csv_reader.headers().map_err(ledger_error)?.clone();
    let drop_index = raw_headers
        .get(0)
        .map(is_unlabeled_index)
        .unwrap_or(false);
    let headers = if drop_index {
        without_leading_field(&raw_headers)
    } else {
        raw_headers
    };
    // An empty file has no header to check.
    if !headers.is_empty() {
        if let Some(missing) = REQUIRED_COLUMNS
            .into_iter()
            .find(|column| !headers.iter().any(|h| h == *column))
        {
            return Err(DashboardError::LedgerReadFailed(format!(
                "ledger header has no {} column",
                missing
            )));
        }
    }

    let mut recent: VecDeque<TradeRecord> = VecDeque::with_capacity(max_count);
    let mut total_rows = 0usize;

    for row in csv_reader.records() {
        let row = row.map_err(ledger_error)?;
        let row = if drop_index {
            without_leading_field(&row)
        } else {
            row
        };

        total_rows += 1;

        let parsed: Result<LedgerRow> = row.deserialize(Some(&headers)).map_err(ledger_error);
        let parsed = parsed.and_then(LedgerRow::into_record);
        let record = match parsed {
            Ok(record) => record,
            Err(err) => {
                warn!(row = total_rows, %err, "skipping unreadable ledger row");
                continue;
            }
        };

        if max_count == 0 {
            continue;
        }
        if recent.len() == max_count {
            recent.pop_front();
        }
        recent.push_back(record);
    }

    Ok(LedgerWindow {
        total_rows,
        records: recent.into(),
    })
}

fn is_unlabeled_index(header: &str) -> bool {
    header.is_empty() || header.starts_with("Unnamed:")
}

fn without_leading_field(record: &StringRecord) -> StringRecord {
    record.iter().skip(1).collect()
}

fn ledger_error(err: impl std::fmt::Display) -> DashboardError {
    DashboardError::LedgerReadFailed(err.to_string())
}
