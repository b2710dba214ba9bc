//! Calibration baseline: reference means, band extents, and tolerance.
//!
//! Baselines are persisted as a flat JSON string array so the file stays
//! hand-inspectable. Slot order is fixed: date, author, five reference means,
//! four band extents, tolerance, and (in newer files) the detector serial
//! number. Older 12-slot files without the serial number still load.
//!
//! A baseline is loaded once per run and immutable thereafter. Writing a new
//! baseline rotates the previous file into a `previous_`-prefixed sibling
//! rather than deleting it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::grid::GRID_SIZE;

/// Slot count including the detector serial number.
const BASELINE_SLOTS: usize = 13;

/// Slot count of older files that end at the tolerance value.
const BASELINE_SLOTS_LEGACY: usize = 12;

/// Calibration constants for one detector, loaded from persistent storage.
///
/// Band extents are 1-based inclusive column numbers in the standard
/// orientation. All reference means are in raw pixel-intensity units.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    /// Date the baseline was measured.
    pub date: String,
    /// Initials of whoever set the baseline.
    pub set_by: String,
    /// Whole-grid mean for the orthogonal pair at couch position x = 0.
    pub orthogonal_ref: f64,
    /// Left oblique's mean in the left band.
    pub left_in_left: f64,
    /// Left oblique's mean in the right band.
    pub left_in_right: f64,
    /// Right oblique's mean in the left band.
    pub right_in_left: f64,
    /// Right oblique's mean in the right band.
    pub right_in_right: f64,
    /// Left band start column.
    pub left_start: u32,
    /// Left band end column.
    pub left_end: u32,
    /// Right band start column.
    pub right_start: u32,
    /// Right band end column.
    pub right_end: u32,
    /// Dose tolerance in percent.
    pub tolerance: f64,
    /// Detector serial number, absent in older baseline files.
    pub device_id: Option<String>,
}

impl Baseline {
    /// Load and validate a baseline file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::unreadable(path, e))?;
        let slots: Vec<String> = serde_json::from_str(&text).map_err(|e| ConfigError::Malformed {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_slots(&slots)
    }

    /// Build a baseline from its persisted slot array.
    pub fn from_slots(slots: &[String]) -> Result<Self, ConfigError> {
        if slots.len() != BASELINE_SLOTS && slots.len() != BASELINE_SLOTS_LEGACY {
            return Err(ConfigError::SlotCount {
                expected: "12 or 13",
                found: slots.len(),
            });
        }
        let baseline = Self {
            date: slots[0].clone(),
            set_by: slots[1].clone(),
            orthogonal_ref: parse_f64(&slots[2], "orthogonal reference")?,
            left_in_left: parse_f64(&slots[3], "left oblique in left band")?,
            left_in_right: parse_f64(&slots[4], "left oblique in right band")?,
            right_in_left: parse_f64(&slots[5], "right oblique in left band")?,
            right_in_right: parse_f64(&slots[6], "right oblique in right band")?,
            left_start: parse_u32(&slots[7], "left band start")?,
            left_end: parse_u32(&slots[8], "left band end")?,
            right_start: parse_u32(&slots[9], "right band start")?,
            right_end: parse_u32(&slots[10], "right band end")?,
            tolerance: parse_f64(&slots[11], "tolerance")?,
            device_id: slots.get(12).cloned(),
        };
        baseline.validate()?;
        Ok(baseline)
    }

    /// Write the baseline to `path`, rotating any existing file to a
    /// `previous_`-prefixed sibling first. Returns the backup path if one
    /// was made. Invalid baselines are rejected before anything is touched
    /// on disk.
    pub fn store(&self, path: &Path) -> Result<Option<PathBuf>, ConfigError> {
        self.validate()?;
        let backup = if path.exists() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let prev = path.with_file_name(format!("previous_{name}"));
            fs::copy(path, &prev).map_err(|e| ConfigError::Write {
                path: prev.clone(),
                source: e,
            })?;
            Some(prev)
        } else {
            None
        };

        let json = serde_json::to_string_pretty(&self.to_slots()).map_err(|e| {
            ConfigError::Write {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e),
            }
        })?;
        fs::write(path, json).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(backup)
    }

    /// Persisted slot array in fixed order.
    pub fn to_slots(&self) -> Vec<String> {
        let mut slots = vec![
            self.date.clone(),
            self.set_by.clone(),
            self.orthogonal_ref.to_string(),
            self.left_in_left.to_string(),
            self.left_in_right.to_string(),
            self.right_in_left.to_string(),
            self.right_in_right.to_string(),
            self.left_start.to_string(),
            self.left_end.to_string(),
            self.right_start.to_string(),
            self.right_end.to_string(),
            self.tolerance.to_string(),
        ];
        if let Some(id) = &self.device_id {
            slots.push(id.clone());
        }
        slots
    }

    /// Reject reference means and band extents the deviation math cannot use.
    ///
    /// The three references that divide on their own must be positive; the
    /// two scatter references only join positive ones in a sum, so zero is
    /// allowed there.
    fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("orthogonal reference", self.orthogonal_ref),
            ("left oblique in left band", self.left_in_left),
            ("left oblique in right band", self.left_in_right),
            ("right oblique in left band", self.right_in_left),
            ("right oblique in right band", self.right_in_right),
            ("tolerance", self.tolerance),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Range {
                    field,
                    requirement: "finite",
                    value,
                });
            }
        }

        let positive = [
            ("orthogonal reference", self.orthogonal_ref),
            ("left oblique in left band", self.left_in_left),
            ("right oblique in right band", self.right_in_right),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::Range {
                    field,
                    requirement: "positive",
                    value,
                });
            }
        }

        let non_negative = [
            ("left oblique in right band", self.left_in_right),
            ("right oblique in left band", self.right_in_left),
            ("tolerance", self.tolerance),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Range {
                    field,
                    requirement: "non-negative",
                    value,
                });
            }
        }

        for (field, start, end) in [
            ("left band", self.left_start, self.left_end),
            ("right band", self.right_start, self.right_end),
        ] {
            if start < 1 || end > GRID_SIZE as u32 || start > end {
                return Err(ConfigError::BandExtent { field, start, end });
            }
        }
        Ok(())
    }
}

fn parse_f64(slot: &str, field: &'static str) -> Result<f64, ConfigError> {
    slot.trim().parse().map_err(|_| ConfigError::FieldParse {
        field,
        value: slot.to_string(),
    })
}

fn parse_u32(slot: &str, field: &'static str) -> Result<u32, ConfigError> {
    slot.trim().parse().map_err(|_| ConfigError::FieldParse {
        field,
        value: slot.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
