//! Source classification from quadrant sums.
//!
//! The kV system fires four geometries: the orthogonal pair, either oblique
//! alone, or both obliques together. Each lights up a distinct set of grid
//! corners, so coarse integrated quadrant sums are enough to tell them apart
//! without any geometric calibration, and the decision stays auditable from
//! raw sums alone.

use std::fmt;

use serde::Serialize;

use crate::regions::RegionStats;

/// Quadrant sum above which a primary beam is considered present.
pub const ORTHOGONAL_MIN: f64 = 500_000.0;

/// Bottom-left sum above which the left oblique is considered present.
pub const OBLIQUE_MIN: f64 = 200_000.0;

/// The beam a reading is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XraySource {
    Orthogonal,
    LeftOnly,
    RightOnly,
    ObliqueLeft,
    ObliqueRight,
    Unknown,
}

impl fmt::Display for XraySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Orthogonal => "Orthogonal",
            Self::LeftOnly => "Left_only",
            Self::RightOnly => "Right_only",
            Self::ObliqueLeft => "Obl_Left",
            Self::ObliqueRight => "Obl_Right",
            Self::Unknown => "Unknown",
        };
        f.pad(label)
    }
}

impl Serialize for XraySource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of the threshold decision procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The orthogonal pair fired.
    Orthogonal,
    /// Left oblique alone.
    LeftOnly,
    /// Right oblique alone.
    RightOnly,
    /// Both obliques fired together.
    BothObliques,
    /// No rule matched.
    Unknown,
}

/// Classify a measurement from its quadrant sums.
///
/// Rules run top-down, first match wins. Boundary convention: primary-beam
/// presence is strict (`> 500 000`) everywhere it appears; left-oblique
/// presence is strict (`> 200 000`) and the right-only rule takes the exact
/// complement (`<= 200 000`), so no sum value falls between rules.
pub fn classify(stats: &RegionStats) -> Classification {
    let RegionStats {
        top_left: tl,
        top_right: tr,
        bottom_left: bl,
        bottom_right: br,
        ..
    } = *stats;

    if tl > ORTHOGONAL_MIN && br > ORTHOGONAL_MIN {
        Classification::Orthogonal
    } else if bl > OBLIQUE_MIN && tr < ORTHOGONAL_MIN && tl < ORTHOGONAL_MIN {
        Classification::LeftOnly
    } else if bl <= OBLIQUE_MIN && tr > ORTHOGONAL_MIN && tl < ORTHOGONAL_MIN {
        Classification::RightOnly
    } else if bl > OBLIQUE_MIN && tr > ORTHOGONAL_MIN && tl < ORTHOGONAL_MIN {
        Classification::BothObliques
    } else {
        Classification::Unknown
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
