//! Append-only measurement history.
//!
//! The history file is a JSON array of preformatted fixed-width records, the
//! first always a column header. Prior entries are never rewritten: a run
//! loads the full sequence, appends one record per (file, source) reading,
//! and persists the whole sequence back once at batch end. An existing file
//! that fails to parse is an error, never something to overwrite.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::classify::XraySource;
use crate::error::HistoryError;
use crate::regions::RegionStats;

/// File-name length kept in a record.
const RECORD_NAME_CHARS: usize = 30;

// ---------------------------------------------------------------------------
// HistoryStore
// ---------------------------------------------------------------------------

/// In-memory view of the persisted history, plus the path it came from.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    records: Vec<String>,
}

impl HistoryStore {
    /// Load the history at `path`, or start a fresh store containing only
    /// the header record if no file exists yet.
    pub fn load(path: &Path) -> Result<Self, HistoryError> {
        let records = match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| HistoryError::Malformed {
                path: path.to_path_buf(),
                source: e,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => vec![header_record()],
            Err(e) => {
                return Err(HistoryError::Unreadable {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Append one formatted record for a reading.
    pub fn append(
        &mut self,
        timestamp: &str,
        file_name: &str,
        source: XraySource,
        stats: &RegionStats,
        deviation: f64,
    ) {
        self.records
            .push(format_record(timestamp, file_name, source, stats, deviation));
    }

    /// Persist the full sequence back to disk.
    pub fn save(&self) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(&self.records).map_err(|e| HistoryError::Write {
            path: self.path.clone(),
            source: io::Error::new(io::ErrorKind::Other, e),
        })?;
        fs::write(&self.path, json).map_err(|e| HistoryError::Write {
            path: self.path.clone(),
            source: e,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in append order, header first.
    pub fn records(&self) -> &[String] {
        &self.records
    }
}

// ---------------------------------------------------------------------------
// Record formatting
// ---------------------------------------------------------------------------

/// Column-header record, always first in a fresh store.
pub fn header_record() -> String {
    format!(
        "{:<22} {:^40} {:^11} {:^11} {:^11} {:^11} {:^11} {:^11} {:>11} {:>11} {:>11} {:>11}",
        "Analysis Date",
        "file",
        "source",
        "BL",
        "BR",
        "TL",
        "TR",
        "CTR",
        "Dose diff",
        "whole mean",
        "left mean",
        "right mean"
    )
}

/// One fixed-width record: timestamp, file, source, the four quadrant sums,
/// central sum, deviation, and the three means.
fn format_record(
    timestamp: &str,
    file_name: &str,
    source: XraySource,
    stats: &RegionStats,
    deviation: f64,
) -> String {
    format!(
        "{:<22} {:<40} {:<11} {:>11.1} {:>11.1} {:>11.1} {:>11.1} {:>11.1} {:>11.1} {:>11.1} {:>11.1} {:>11.1}",
        timestamp,
        clip(file_name, RECORD_NAME_CHARS),
        source,
        stats.bottom_left,
        stats.bottom_right,
        stats.top_left,
        stats.top_right,
        stats.central,
        deviation,
        stats.whole_mean,
        stats.left_mean,
        stats.right_mean,
    )
}

/// Cut a string to at most `max` characters, on a char boundary.
fn clip(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Current time as an ISO-8601 UTC timestamp, e.g. `2026-08-22T14:07:12Z`.
pub fn now_timestamp() -> String {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format_iso8601(since_epoch.as_secs())
}

/// Format seconds since the Unix epoch as an ISO-8601 timestamp.
fn format_iso8601(secs: u64) -> String {
    let (year, month, day, hour, min, sec) = secs_to_utc(secs);
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{min:02}:{sec:02}Z")
}

/// Convert seconds since the Unix epoch to (year, month, day, hour, minute,
/// second) UTC. No leap second handling.
fn secs_to_utc(secs: u64) -> (u64, u64, u64, u64, u64, u64) {
    let sec = secs % 60;
    let min = (secs / 60) % 60;
    let hour = (secs / 3600) % 24;

    let mut days = secs / 86400;
    let mut year = 1970u64;

    loop {
        let days_in_year = if is_leap(year) { 366 } else { 365 };
        if days < days_in_year {
            break;
        }
        days -= days_in_year;
        year += 1;
    }

    let months_days: [u64; 12] = if is_leap(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 0u64;
    for (i, &md) in months_days.iter().enumerate() {
        if days < md {
            month = i as u64 + 1;
            break;
        }
        days -= md;
    }
    let day = days + 1;

    (year, month, day, hour, min, sec)
}

fn is_leap(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
