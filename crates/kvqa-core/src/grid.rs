//! Measurement-grid parsing for Lynx OPG exports.
//!
//! OPG files are plain text: a fixed header block, an `<asciibody>` marker on
//! line 27, then 600 data rows. Each data row starts with a row-position
//! label followed by 600 pixel intensities separated by whitespace, commas,
//! or semicolons.
//!
//! A missing marker is logged and parsing continues best-effort; structural
//! damage to the data rows themselves (ragged row, bad token, truncation) is
//! an error for that file.

use std::fs;
use std::ops::Range;
use std::path::Path;

use crate::error::GridError;

/// Grid edge length in pixels. Lynx panels export 600x600 intensity maps.
pub const GRID_SIZE: usize = 600;

/// Detector reading at which a pixel clips.
pub const SATURATION_VALUE: f64 = 1023.0;

/// Structural marker opening the pixel-data section.
const BODY_MARKER: &str = "<asciibody>";

/// Line index (0-based) that must carry the body marker.
const MARKER_LINE: usize = 26;

/// Line index (0-based) of the first grid row.
const FIRST_DATA_LINE: usize = 31;

// ---------------------------------------------------------------------------
// PixelGrid
// ---------------------------------------------------------------------------

/// A fully populated 600x600 intensity grid from one measurement file.
///
/// Stored row-major. Read-only after construction.
#[derive(Debug, Clone)]
pub struct PixelGrid {
    data: Vec<f64>,
}

impl PixelGrid {
    /// Parse a grid from an OPG measurement file.
    pub fn from_opg_file(path: &Path) -> Result<Self, GridError> {
        let text = fs::read_to_string(path).map_err(|e| GridError::read(path, e))?;
        let mut data = vec![0.0f64; GRID_SIZE * GRID_SIZE];
        let mut rows_seen = 0usize;

        for (i, line) in text.lines().enumerate() {
            if i == MARKER_LINE && !line.starts_with(BODY_MARKER) {
                log::warn!(
                    "format mismatch in '{}': line {} = \"{}\", expected \"{}\"",
                    path.display(),
                    MARKER_LINE + 1,
                    line.trim_end(),
                    BODY_MARKER
                );
            }
            if (FIRST_DATA_LINE..FIRST_DATA_LINE + GRID_SIZE).contains(&i) {
                let row = i - FIRST_DATA_LINE;
                parse_row(line, i + 1, &mut data[row * GRID_SIZE..(row + 1) * GRID_SIZE])?;
                rows_seen += 1;
            }
        }

        if rows_seen < GRID_SIZE {
            return Err(GridError::Truncated {
                rows: rows_seen,
                expected: GRID_SIZE,
            });
        }
        Ok(Self { data })
    }

    /// Build a grid by evaluating `f` at every (row, column) position.
    pub fn from_fn(f: impl Fn(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                data.push(f(row, col));
            }
        }
        Self { data }
    }

    /// Intensity at (row, column).
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.data[row * GRID_SIZE + col]
    }

    /// Sum of intensities over a rectangular block.
    pub fn block_sum(&self, rows: Range<usize>, cols: Range<usize>) -> f64 {
        let mut sum = 0.0;
        for row in rows {
            let base = row * GRID_SIZE;
            for col in cols.clone() {
                sum += self.data[base + col];
            }
        }
        sum
    }

    /// Mean intensity over a full-height column band.
    pub fn band_mean(&self, cols: Range<usize>) -> f64 {
        let width = cols.len();
        if width == 0 {
            return 0.0;
        }
        self.block_sum(0..GRID_SIZE, cols) / (width * GRID_SIZE) as f64
    }

    /// Mean intensity over the whole grid.
    pub fn whole_mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Number of pixels at the detector's maximum representable reading.
    pub fn saturated_pixels(&self) -> usize {
        self.data.iter().filter(|&&v| v == SATURATION_VALUE).count()
    }
}

/// Split one data row on whitespace, commas, or semicolons, drop the leading
/// row-position label, and parse the remaining 600 pixel values.
fn parse_row(line: &str, line_no: usize, out: &mut [f64]) -> Result<(), GridError> {
    let tokens: Vec<&str> = line
        .split(|ch: char| ch.is_whitespace() || ch == ',' || ch == ';')
        .filter(|t| !t.is_empty())
        .collect();
    let values = tokens.get(1..).unwrap_or(&[]);
    if values.len() != out.len() {
        return Err(GridError::RaggedRow {
            line: line_no,
            expected: out.len(),
            found: values.len(),
        });
    }
    for (slot, token) in out.iter_mut().zip(values) {
        *slot = token.parse().map_err(|_| GridError::BadValue {
            line: line_no,
            token: (*token).to_string(),
        })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
