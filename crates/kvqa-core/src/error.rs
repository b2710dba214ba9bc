//! Typed error values for the analysis core.
//!
//! Per-file errors ([`GridError`]) are recoverable: the batch reports them and
//! moves on to the next measurement. Configuration errors ([`ConfigError`])
//! and history-store errors ([`HistoryError`]) are fatal before any file is
//! processed — a run never starts against a baseline or audit trail it cannot
//! trust.

use std::path::PathBuf;

/// Errors raised while loading or validating the calibration baseline.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The baseline file could not be read.
    #[error("baseline file '{path}' could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The baseline file is not a JSON string array.
    #[error("baseline file '{path}' is not a value array: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The baseline array has the wrong number of slots.
    #[error("baseline holds {found} values, expected {expected}")]
    SlotCount { expected: &'static str, found: usize },

    /// A slot did not parse as its declared numeric type.
    #[error("baseline field '{field}' is not numeric: '{value}'")]
    FieldParse { field: &'static str, value: String },

    /// A numeric slot violates its allowed range.
    #[error("baseline value '{field}' must be {requirement}, got {value}")]
    Range {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },

    /// Band column extents fall outside the grid or are reversed.
    #[error("band extent {field} ({start}..{end}) is outside 1..=600 or reversed")]
    BandExtent {
        field: &'static str,
        start: u32,
        end: u32,
    },

    /// The baseline file could not be written.
    #[error("failed to write baseline '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Per-file errors raised while parsing a measurement grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The measurement file could not be read.
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A grid row held the wrong number of values after the row label.
    #[error("line {line}: expected {expected} pixel values, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A pixel token did not parse as a floating-point value.
    #[error("line {line}: unparseable pixel value '{token}'")]
    BadValue { line: usize, token: String },

    /// The file ended before all grid rows were seen.
    #[error("file ended after {rows} of {expected} grid rows")]
    Truncated { rows: usize, expected: usize },
}

/// Errors raised by the persistent measurement history.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The history file exists but could not be read.
    #[error("history file '{path}' could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The history file exists but is not a JSON string array. The store
    /// refuses to proceed rather than overwrite an audit trail it cannot
    /// parse.
    #[error("history file '{path}' is not a record array: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The history file could not be written back.
    #[error("failed to write history '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl GridError {
    /// Create a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

impl ConfigError {
    /// Create an unreadable-baseline error.
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }
}
