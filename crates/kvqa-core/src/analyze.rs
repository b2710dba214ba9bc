//! Per-measurement analysis pipeline.
//!
//! Ties the stages together for one file: parse the grid, measure regions
//! under the file-name orientation, classify the source, compute per-source
//! deviations. Batch concerns (tolerance tracking, history, reporting) stay
//! with the caller so a failed file never disturbs its neighbours.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::baseline::Baseline;
use crate::classify::classify;
use crate::deviation::{SourceReading, dose_deviations};
use crate::error::GridError;
use crate::grid::PixelGrid;
use crate::regions::{Orientation, RegionStats};

/// Everything derived from one measurement file.
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    pub file_name: String,
    pub orientation: Orientation,
    pub stats: RegionStats,
    /// One entry per active source; two when both obliques fired together.
    pub readings: Vec<SourceReading>,
    pub saturated_pixels: usize,
}

/// Analyse one measurement file against the baseline.
pub fn analyze_file(path: &Path, baseline: &Baseline) -> Result<FileAnalysis, GridError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let grid = PixelGrid::from_opg_file(path)?;
    let orientation = Orientation::from_file_name(&file_name);
    let stats = RegionStats::measure(&grid, baseline, orientation);
    let readings = dose_deviations(classify(&stats), &stats, baseline);

    let saturated_pixels = grid.saturated_pixels();
    if saturated_pixels > 0 {
        log::warn!("{saturated_pixels} saturated pixels in image: {file_name}");
    }

    Ok(FileAnalysis {
        file_name,
        orientation,
        stats,
        readings,
        saturated_pixels,
    })
}

/// List measurement files in `dir` ending in `extension`, sorted by name so
/// a batch always runs in the same order.
pub fn list_measurement_files(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .map(|n| n.to_string_lossy().ends_with(extension))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
