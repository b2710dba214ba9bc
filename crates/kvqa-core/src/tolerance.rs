//! Batch tolerance evaluation and corrective guidance.

use std::fmt;

use crate::classify::XraySource;
use crate::deviation::SourceReading;

/// Tracks the largest-magnitude deviation across a batch.
///
/// Comparisons use absolute value; the stored deviation keeps its sign.
/// First occurrence wins on exact ties. A classification failure anywhere in
/// the batch is remembered separately and forces the failed verdict.
#[derive(Debug, Default)]
pub struct ToleranceEvaluator {
    max_deviation: f64,
    max_source: Option<XraySource>,
    saw_unknown: bool,
}

impl ToleranceEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one reading into the running maximum.
    pub fn record(&mut self, reading: &SourceReading) {
        if reading.source == XraySource::Unknown {
            self.saw_unknown = true;
        }
        if reading.deviation.abs() > self.max_deviation.abs() {
            self.max_deviation = reading.deviation;
            self.max_source = Some(reading.source);
        }
    }

    /// Signed deviation with the largest magnitude seen so far.
    pub fn max_deviation(&self) -> f64 {
        self.max_deviation
    }

    /// Source that produced the current maximum.
    pub fn max_source(&self) -> Option<XraySource> {
        self.max_source
    }

    /// Final verdict for the batch.
    pub fn verdict(&self, tolerance: f64) -> Verdict {
        if self.saw_unknown {
            Verdict::Failed
        } else if self.max_deviation.abs() > tolerance {
            Verdict::OutOfTolerance(self.max_deviation)
        } else {
            Verdict::Pass
        }
    }

    /// Physical-setup correction hint keyed off the final maximum.
    ///
    /// A moderately low right-oblique reading is the signature of couch bars
    /// left in the beam path; a high left-oblique reading is the signature of
    /// the couch parked outside the treatment position.
    pub fn guidance(&self) -> Option<&'static str> {
        match self.max_source {
            Some(XraySource::ObliqueRight)
                if self.max_deviation > -20.0 && self.max_deviation < -5.0 =>
            {
                Some("Check that the couch bars are OUT and repeat the oblique measurement")
            }
            Some(XraySource::ObliqueLeft) if self.max_deviation > 20.0 => Some(
                "Check that the couch is in the treatment position and repeat the oblique measurement",
            ),
            _ => None,
        }
    }
}

/// Batch verdict, ordered by precedence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// At least one measurement failed to classify.
    Failed,
    /// The largest deviation exceeds the baseline tolerance.
    OutOfTolerance(f64),
    /// Every deviation within tolerance.
    Pass,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed => f.write_str(
                "Analysis failed for at least one measurement, please check files with 'Unknown' source",
            ),
            Self::OutOfTolerance(d) => {
                write!(f, "Maximum dose difference of {d:.1}% OUT OF TOLERANCE")
            }
            Self::Pass => f.write_str("Pass. Dose within tolerance"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deviation::UNKNOWN_DEVIATION;

    fn reading(source: XraySource, deviation: f64) -> SourceReading {
        SourceReading { source, deviation }
    }

    // -----------------------------------------------------------------------
    // Maximum tracking
    // -----------------------------------------------------------------------

    #[test]
    fn test_tracks_largest_magnitude() {
        let mut eval = ToleranceEvaluator::new();
        eval.record(&reading(XraySource::Orthogonal, 1.5));
        eval.record(&reading(XraySource::LeftOnly, -4.2));
        eval.record(&reading(XraySource::RightOnly, 2.0));
        assert_eq!(eval.max_deviation(), -4.2);
        assert_eq!(eval.max_source(), Some(XraySource::LeftOnly));
    }

    #[test]
    fn test_first_occurrence_wins_on_tie() {
        let mut eval = ToleranceEvaluator::new();
        eval.record(&reading(XraySource::ObliqueLeft, 5.0));
        eval.record(&reading(XraySource::ObliqueRight, -5.0));
        assert_eq!(eval.max_deviation(), 5.0);
        assert_eq!(eval.max_source(), Some(XraySource::ObliqueLeft));
    }

    #[test]
    fn test_sign_preserved() {
        let mut eval = ToleranceEvaluator::new();
        eval.record(&reading(XraySource::ObliqueRight, -12.0));
        assert_eq!(eval.max_deviation(), -12.0);
    }

    // -----------------------------------------------------------------------
    // Verdict
    // -----------------------------------------------------------------------

    #[test]
    fn test_pass_within_tolerance() {
        let mut eval = ToleranceEvaluator::new();
        eval.record(&reading(XraySource::Orthogonal, 2.0));
        assert_eq!(eval.verdict(3.0), Verdict::Pass);
    }

    #[test]
    fn test_tolerance_boundary_is_strict() {
        let mut eval = ToleranceEvaluator::new();
        eval.record(&reading(XraySource::Orthogonal, 3.0));
        assert_eq!(eval.verdict(3.0), Verdict::Pass);
        eval.record(&reading(XraySource::Orthogonal, -3.1));
        assert_eq!(eval.verdict(3.0), Verdict::OutOfTolerance(-3.1));
    }

    #[test]
    fn test_unknown_forces_failure() {
        let mut eval = ToleranceEvaluator::new();
        eval.record(&reading(XraySource::Orthogonal, 0.5));
        eval.record(&reading(XraySource::Unknown, UNKNOWN_DEVIATION));
        eval.record(&reading(XraySource::RightOnly, 1.0));
        assert_eq!(eval.verdict(3.0), Verdict::Failed);
    }

    #[test]
    fn test_sentinel_participates_in_maximum() {
        let mut eval = ToleranceEvaluator::new();
        eval.record(&reading(XraySource::Unknown, UNKNOWN_DEVIATION));
        assert_eq!(eval.max_deviation(), UNKNOWN_DEVIATION);
        assert_eq!(eval.verdict(3.0), Verdict::Failed);
    }

    #[test]
    fn test_empty_evaluator_passes() {
        let eval = ToleranceEvaluator::new();
        assert_eq!(eval.verdict(3.0), Verdict::Pass);
        assert_eq!(eval.guidance(), None);
    }

    #[test]
    fn test_verdict_messages() {
        assert_eq!(
            Verdict::OutOfTolerance(4.26).to_string(),
            "Maximum dose difference of 4.3% OUT OF TOLERANCE"
        );
        assert_eq!(Verdict::Pass.to_string(), "Pass. Dose within tolerance");
        assert!(Verdict::Failed.to_string().contains("'Unknown' source"));
    }

    // -----------------------------------------------------------------------
    // Guidance
    // -----------------------------------------------------------------------

    #[test]
    fn test_couch_bar_guidance() {
        let mut eval = ToleranceEvaluator::new();
        eval.record(&reading(XraySource::ObliqueRight, -10.0));
        assert_eq!(
            eval.guidance(),
            Some("Check that the couch bars are OUT and repeat the oblique measurement")
        );
    }

    #[test]
    fn test_couch_position_guidance() {
        let mut eval = ToleranceEvaluator::new();
        eval.record(&reading(XraySource::ObliqueLeft, 25.0));
        assert_eq!(
            eval.guidance(),
            Some(
                "Check that the couch is in the treatment position and repeat the oblique measurement"
            )
        );
    }

    #[test]
    fn test_guidance_requires_matching_source() {
        let mut eval = ToleranceEvaluator::new();
        eval.record(&reading(XraySource::ObliqueLeft, -10.0));
        assert_eq!(eval.guidance(), None);

        let mut eval = ToleranceEvaluator::new();
        eval.record(&reading(XraySource::ObliqueRight, 25.0));
        assert_eq!(eval.guidance(), None);
    }

    #[test]
    fn test_guidance_boundaries_are_strict() {
        for dev in [-5.0, -20.0] {
            let mut eval = ToleranceEvaluator::new();
            eval.record(&reading(XraySource::ObliqueRight, dev));
            assert_eq!(eval.guidance(), None, "deviation {dev}");
        }
        let mut eval = ToleranceEvaluator::new();
        eval.record(&reading(XraySource::ObliqueLeft, 20.0));
        assert_eq!(eval.guidance(), None);
    }
}
