//! Percentage dose deviation from baseline, per active source.

use serde::Serialize;

use crate::baseline::Baseline;
use crate::classify::{Classification, XraySource};
use crate::regions::RegionStats;

/// Deviation recorded when classification failed.
pub const UNKNOWN_DEVIATION: f64 = 999.0;

/// One active source and its percentage deviation from baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SourceReading {
    pub source: XraySource,
    pub deviation: f64,
}

/// Compute the deviation reading(s) for a classified measurement.
///
/// Single-source modes compare one measured mean against one reference.
/// When both obliques fire together each band sees dose from both sources,
/// so the reference is the sum of the two per-band references.
pub fn dose_deviations(
    classification: Classification,
    stats: &RegionStats,
    baseline: &Baseline,
) -> Vec<SourceReading> {
    match classification {
        Classification::Orthogonal => vec![SourceReading {
            source: XraySource::Orthogonal,
            deviation: percent_from(stats.whole_mean, baseline.orthogonal_ref),
        }],
        Classification::LeftOnly => vec![SourceReading {
            source: XraySource::LeftOnly,
            deviation: percent_from(stats.left_mean, baseline.left_in_left),
        }],
        Classification::RightOnly => vec![SourceReading {
            source: XraySource::RightOnly,
            deviation: percent_from(stats.right_mean, baseline.right_in_right),
        }],
        Classification::BothObliques => vec![
            SourceReading {
                source: XraySource::ObliqueLeft,
                deviation: percent_from(
                    stats.left_mean,
                    baseline.left_in_left + baseline.right_in_left,
                ),
            },
            SourceReading {
                source: XraySource::ObliqueRight,
                deviation: percent_from(
                    stats.right_mean,
                    baseline.left_in_right + baseline.right_in_right,
                ),
            },
        ],
        Classification::Unknown => vec![SourceReading {
            source: XraySource::Unknown,
            deviation: UNKNOWN_DEVIATION,
        }],
    }
}

/// Percentage deviation of `measured` from `reference`.
fn percent_from(measured: f64, reference: f64) -> f64 {
    (measured - reference) / reference * 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
