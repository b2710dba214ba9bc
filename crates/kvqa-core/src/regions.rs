//! Region statistics over a measurement grid.
//!
//! Quadrants are the four 100x100 corner blocks, the central region is the
//! fixed 300x300 middle block, and the side bands are full-height column
//! strips whose extents come from the baseline.
//!
//! Lynx2D captures are rotated 180 degrees relative to the myQA reference
//! frame. A measurement whose file stem ends in `180` selects the rotated
//! mapping: logical quadrants swap diagonally and band columns mirror, so
//! the same physical beam lands in the same logical region either way.

use std::fmt;
use std::ops::Range;
use std::path::Path;

use serde::Serialize;

use crate::baseline::Baseline;
use crate::grid::{GRID_SIZE, PixelGrid};

/// Corner block edge length in pixels.
const QUADRANT_SIZE: usize = 100;

/// Central block extent, applied to both rows and columns.
const CENTRAL: Range<usize> = 150..450;

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// Detector orientation encoded in the measurement file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Standard,
    Rotated180,
}

impl Orientation {
    /// Derive the orientation from a measurement file name. The three
    /// characters before the extension carry the orientation code; `180`
    /// selects the rotated mapping, any other code the standard one.
    pub fn from_file_name(name: &str) -> Self {
        let stem = Path::new(name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if stem.ends_with("180") {
            return Self::Rotated180;
        }
        let code: Vec<char> = stem.chars().rev().take(3).collect();
        if code.len() < 3 || !code.iter().all(|ch| ch.is_ascii_digit()) {
            log::debug!("no orientation code in '{name}', assuming standard");
        }
        Self::Standard
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Rotated180 => write!(f, "rotated-180"),
        }
    }
}

impl Serialize for Orientation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// RegionStats
// ---------------------------------------------------------------------------

/// Derived quantities for one measurement: quadrant sums, central sum, and
/// the three means the deviation math runs on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionStats {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_left: f64,
    pub bottom_right: f64,
    pub central: f64,
    pub whole_mean: f64,
    pub left_mean: f64,
    pub right_mean: f64,
}

impl RegionStats {
    /// Measure `grid` under `orientation`, with band columns taken from the
    /// baseline extents.
    pub fn measure(grid: &PixelGrid, baseline: &Baseline, orientation: Orientation) -> Self {
        let lo = 0..QUADRANT_SIZE;
        let hi = GRID_SIZE - QUADRANT_SIZE..GRID_SIZE;

        let (top_left, top_right, bottom_left, bottom_right) = match orientation {
            Orientation::Standard => (
                grid.block_sum(lo.clone(), lo.clone()),
                grid.block_sum(lo.clone(), hi.clone()),
                grid.block_sum(hi.clone(), lo.clone()),
                grid.block_sum(hi.clone(), hi.clone()),
            ),
            Orientation::Rotated180 => (
                grid.block_sum(hi.clone(), hi.clone()),
                grid.block_sum(hi.clone(), lo.clone()),
                grid.block_sum(lo.clone(), hi.clone()),
                grid.block_sum(lo.clone(), lo.clone()),
            ),
        };

        let (left_cols, right_cols) = band_columns(baseline, orientation);
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
            central: grid.block_sum(CENTRAL, CENTRAL),
            whole_mean: grid.whole_mean(),
            left_mean: grid.band_mean(left_cols),
            right_mean: grid.band_mean(right_cols),
        }
    }
}

/// Convert 1-based inclusive extents to 0-based half-open column ranges,
/// mirrored under rotation.
fn band_columns(baseline: &Baseline, orientation: Orientation) -> (Range<usize>, Range<usize>) {
    let band = |start: u32, end: u32| -> Range<usize> {
        let (start, end) = (start as usize, end as usize);
        match orientation {
            Orientation::Standard => start - 1..end,
            Orientation::Rotated180 => GRID_SIZE - end..GRID_SIZE - start + 1,
        }
    };
    (
        band(baseline.left_start, baseline.left_end),
        band(baseline.right_start, baseline.right_end),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{corner_grid, test_baseline};

    // -----------------------------------------------------------------------
    // Orientation parsing
    // -----------------------------------------------------------------------

    #[test]
    fn test_orientation_from_file_name() {
        assert_eq!(
            Orientation::from_file_name("7_image_i_180.opg"),
            Orientation::Rotated180
        );
        assert_eq!(
            Orientation::from_file_name("7_image_i_000.opg"),
            Orientation::Standard
        );
        assert_eq!(
            Orientation::from_file_name("plain180.opg"),
            Orientation::Rotated180
        );
        assert_eq!(
            Orientation::from_file_name("no_code.opg"),
            Orientation::Standard
        );
        assert_eq!(Orientation::from_file_name(""), Orientation::Standard);
    }

    #[test]
    fn test_orientation_display() {
        assert_eq!(Orientation::Standard.to_string(), "standard");
        assert_eq!(Orientation::Rotated180.to_string(), "rotated-180");
    }

    // -----------------------------------------------------------------------
    // Quadrant mapping
    // -----------------------------------------------------------------------

    #[test]
    fn test_standard_quadrants() {
        let grid = corner_grid(1.0, 2.0, 3.0, 4.0);
        let stats = RegionStats::measure(&grid, &test_baseline(), Orientation::Standard);
        assert_eq!(stats.top_left, 10_000.0);
        assert_eq!(stats.top_right, 20_000.0);
        assert_eq!(stats.bottom_left, 30_000.0);
        assert_eq!(stats.bottom_right, 40_000.0);
    }

    #[test]
    fn test_rotated_quadrants_swap_diagonally() {
        let grid = corner_grid(1.0, 2.0, 3.0, 4.0);
        let stats = RegionStats::measure(&grid, &test_baseline(), Orientation::Rotated180);
        assert_eq!(stats.top_left, 40_000.0);
        assert_eq!(stats.top_right, 30_000.0);
        assert_eq!(stats.bottom_left, 20_000.0);
        assert_eq!(stats.bottom_right, 10_000.0);
    }

    #[test]
    fn test_central_sum() {
        let grid = PixelGrid::from_fn(|r, c| {
            if (150..450).contains(&r) && (150..450).contains(&c) {
                2.0
            } else {
                0.0
            }
        });
        let stats = RegionStats::measure(&grid, &test_baseline(), Orientation::Standard);
        assert_eq!(stats.central, 180_000.0);
    }

    // -----------------------------------------------------------------------
    // Band columns
    // -----------------------------------------------------------------------

    #[test]
    fn test_band_means_standard_and_rotated() {
        let mut baseline = test_baseline();
        baseline.left_start = 1;
        baseline.left_end = 100;
        baseline.right_start = 501;
        baseline.right_end = 600;

        let grid = PixelGrid::from_fn(|_, c| {
            if c < 100 {
                4.0
            } else if c >= 500 {
                9.0
            } else {
                0.0
            }
        });

        let std = RegionStats::measure(&grid, &baseline, Orientation::Standard);
        assert_eq!(std.left_mean, 4.0);
        assert_eq!(std.right_mean, 9.0);

        let rot = RegionStats::measure(&grid, &baseline, Orientation::Rotated180);
        assert_eq!(rot.left_mean, 9.0);
        assert_eq!(rot.right_mean, 4.0);
    }

    #[test]
    fn test_band_width_preserved_under_rotation() {
        let mut baseline = test_baseline();
        baseline.left_start = 1;
        baseline.left_end = 80;
        // count columns by putting 1.0 everywhere
        let grid = PixelGrid::from_fn(|_, _| 1.0);
        let std = RegionStats::measure(&grid, &baseline, Orientation::Standard);
        let rot = RegionStats::measure(&grid, &baseline, Orientation::Rotated180);
        assert_eq!(std.left_mean, 1.0);
        assert_eq!(rot.left_mean, 1.0);
    }

    // -----------------------------------------------------------------------
    // Rotation symmetry
    // -----------------------------------------------------------------------

    #[test]
    fn test_rotation_symmetry() {
        // integer-valued asymmetric grid keeps all sums exact
        let src = PixelGrid::from_fn(|r, c| ((r * 7 + c * 13) % 50) as f64);
        let rot = PixelGrid::from_fn(|r, c| src.value(GRID_SIZE - 1 - r, GRID_SIZE - 1 - c));
        let baseline = test_baseline();

        let a = RegionStats::measure(&src, &baseline, Orientation::Standard);
        let b = RegionStats::measure(&rot, &baseline, Orientation::Rotated180);
        assert_eq!(a, b);
    }
}
