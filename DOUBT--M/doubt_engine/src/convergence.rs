use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::levels::LevelRecord;

/// Default stability threshold for both certainty and doubt deltas.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Result of comparing two consecutive levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConvergenceCheck {
    /// Both deltas fell strictly below the threshold.
    pub achieved: bool,
    /// Absolute change in carried-in certainty.
    pub certainty_stability: f64,
    /// Absolute change in doubt strength.
    pub doubt_stability: f64,
    /// Threshold applied.
    pub threshold: f64,
}

/// Recorded whenever an analysis converges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvergencePattern {
    /// Level at which convergence was detected.
    pub level: u8,
    /// Certainty delta at detection.
    pub certainty_diff: f64,
    /// Doubt delta at detection.
    pub doubt_diff: f64,
    /// Detection time.
    pub timestamp: DateTime<Utc>,
}

/// Compares consecutive [`LevelRecord`]s.
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceDetector {
    threshold: f64,
}

impl ConvergenceDetector {
    /// Creates a detector with the given threshold.
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Compares the certainty each level started from (not the updated value)
    /// and the doubt strengths.
    #[must_use]
    pub fn check(&self, previous: &LevelRecord, current: &LevelRecord) -> ConvergenceCheck {
        let certainty_stability =
            (previous.certainty_assessment - current.certainty_assessment).abs();
        let doubt_stability = (previous.doubt_strength - current.doubt_strength).abs();
        ConvergenceCheck {
            achieved: certainty_stability < self.threshold && doubt_stability < self.threshold,
            certainty_stability,
            doubt_stability,
            threshold: self.threshold,
        }
    }

    /// Runs [`Self::check`] and turns a converged result into a pattern record.
    #[must_use]
    pub fn detect(
        &self,
        previous: &LevelRecord,
        current: &LevelRecord,
    ) -> Option<ConvergencePattern> {
        let check = self.check(previous, current);
        check.achieved.then(|| ConvergencePattern {
            level: current.level,
            certainty_diff: check.certainty_stability,
            doubt_diff: check.doubt_stability,
            timestamp: Utc::now(),
        })
    }
}

impl Default for ConvergenceDetector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ResolutionApproach;

    fn record(level: u8, certainty: f64, doubt: f64) -> LevelRecord {
        LevelRecord {
            level,
            name: format!("level {level}"),
            description: String::new(),
            doubt_questions: Vec::new(),
            certainty_assessment: certainty,
            doubt_strength: doubt,
            insights: Vec::new(),
            resolution_approach: ResolutionApproach::ReasonableCertainty,
        }
    }

    #[test]
    fn converges_only_when_both_deltas_are_small() {
        let detector = ConvergenceDetector::default();
        assert!(detector.check(&record(1, 0.5, 0.4), &record(2, 0.55, 0.45)).achieved);
        assert!(!detector.check(&record(1, 0.5, 0.4), &record(2, 0.65, 0.45)).achieved);
        assert!(!detector.check(&record(1, 0.5, 0.4), &record(2, 0.55, 0.6)).achieved);
    }

    #[test]
    fn threshold_is_strict() {
        let detector = ConvergenceDetector::new(0.25);
        let check = detector.check(&record(1, 0.5, 0.5), &record(2, 0.75, 0.5));
        assert!(!check.achieved);
        assert!((check.certainty_stability - 0.25).abs() < 1e-12);
    }

    #[test]
    fn detect_records_current_level() {
        let detector = ConvergenceDetector::default();
        let pattern = detector
            .detect(&record(3, 0.4, 0.6), &record(4, 0.42, 0.61))
            .unwrap();
        assert_eq!(pattern.level, 4);
        assert!((pattern.doubt_diff - 0.01).abs() < 1e-9);
        assert!(detector.detect(&record(1, 0.1, 0.1), &record(2, 0.9, 0.1)).is_none());
    }
}
