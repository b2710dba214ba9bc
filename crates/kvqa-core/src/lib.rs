//! # kvqa-core
//!
//! Measurement analysis for kV X-ray dose QA on Lynx detector exports.
//!
//! Each `.opg` measurement file holds a 600x600 pixel-intensity grid. The
//! pipeline parses the grid, sums fixed corner quadrants and a central block,
//! classifies which beam fired from those sums, and reports each active
//! source's percentage dose deviation from a calibrated baseline. A batch
//! ends with a pass/fail verdict against the baseline tolerance and one
//! appended history record per (file, source) reading.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use kvqa_core::{analyze_file, Baseline, ToleranceEvaluator};
//!
//! let baseline = Baseline::load(Path::new("bin/baseline.json"))?;
//! let mut evaluator = ToleranceEvaluator::new();
//!
//! let analysis = analyze_file(Path::new("Measurements/7_image_i_000.opg"), &baseline)?;
//! for reading in &analysis.readings {
//!     println!("{} {:+.1}%", reading.source, reading.deviation);
//!     evaluator.record(reading);
//! }
//! println!("{}", evaluator.verdict(baseline.tolerance));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Pipeline
//!
//! GridLoader → RegionAnalyzer → SourceClassifier → DoseDeviationCalculator,
//! with [`ToleranceEvaluator`] and [`HistoryStore`] accumulating across the
//! batch. Per-file errors never abort a batch; only an unusable baseline
//! stops a run before it starts.

pub mod analyze;
pub mod baseline;
pub mod classify;
pub mod deviation;
pub mod error;
pub mod grid;
pub mod history;
pub mod regions;
pub mod tolerance;

#[cfg(test)]
mod testutil;

pub use analyze::{FileAnalysis, analyze_file, list_measurement_files};
pub use baseline::Baseline;
pub use classify::{Classification, OBLIQUE_MIN, ORTHOGONAL_MIN, XraySource, classify};
pub use deviation::{SourceReading, UNKNOWN_DEVIATION, dose_deviations};
pub use error::{ConfigError, GridError, HistoryError};
pub use grid::{GRID_SIZE, PixelGrid, SATURATION_VALUE};
pub use history::{HistoryStore, header_record, now_timestamp};
pub use regions::{Orientation, RegionStats};
pub use tolerance::{ToleranceEvaluator, Verdict};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
