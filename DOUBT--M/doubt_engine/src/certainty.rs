use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{engine::AnalysisResult, levels::LevelRecord, synthesis::Recommendation};

/// Certainty before level 1.
pub const NEUTRAL_PRIOR: f64 = 0.5;

/// Depth used by certainty assessments.
pub const ASSESSMENT_DEPTH: u32 = 3;

const Z_95: f64 = 1.96;

/// Folds a completed level into the running certainty.
///
/// Doubt costs 0.3 per unit of strength and each insight adds 0.1, then level 1
/// is damped (×0.9), level 2 boosted (×1.1) and level 7 damped (×0.8).
#[must_use]
pub fn update_certainty(current: f64, record: &LevelRecord) -> f64 {
    let doubt_impact = record.doubt_strength * 0.3;
    let insight_value = record.insights.len() as f64 * 0.1;
    let mut next = current - doubt_impact + insight_value;
    match record.level {
        1 => next *= 0.9,
        2 => next *= 1.1,
        7 => next *= 0.8,
        _ => {}
    }
    next.clamp(0.0, 1.0)
}

/// Structured context accepted by certainty assessments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EvidenceContext {
    /// Evidence offered for the statement.
    #[serde(default)]
    pub evidence: Vec<String>,
    /// How the evidence was obtained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methodology: Option<String>,
}

/// 95% band around the overall certainty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceBounds {
    /// Lower bound, floored at 0.
    pub lower: f64,
    /// Upper bound, capped at 1.
    pub upper: f64,
}

/// Spread of the per-level certainties around the point estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceIntervals {
    /// Point estimate (overall certainty).
    pub certainty: f64,
    /// Root mean squared deviation of carried-in certainties from the estimate.
    pub standard_deviation: f64,
    /// Estimate ± 1.96 standard deviations.
    pub confidence_95: ConfidenceBounds,
}

impl ConfidenceIntervals {
    /// Deviations are taken from `overall_certainty`, averaged over the level count.
    #[must_use]
    pub fn from_analysis(analysis: &AnalysisResult) -> Self {
        let certainty = analysis.overall_certainty;
        let count = analysis.doubt_levels.len().max(1) as f64;
        let variance = analysis
            .doubt_levels
            .iter()
            .map(|level| (level.certainty_assessment - certainty).powi(2))
            .sum::<f64>()
            / count;
        let standard_deviation = variance.sqrt();
        let margin = Z_95 * standard_deviation;
        Self {
            certainty,
            standard_deviation,
            confidence_95: ConfidenceBounds {
                lower: (certainty - margin).max(0.0),
                upper: (certainty + margin).min(1.0),
            },
        }
    }
}

/// Reasons an analysis should not be trusted outright.
#[must_use]
pub fn uncertainty_factors(analysis: &AnalysisResult) -> Vec<String> {
    let mut factors = Vec::new();
    if analysis.overall_certainty < 0.7 {
        factors.push("Low overall certainty from doubt analysis".to_string());
    }
    if !analysis.convergence_achieved {
        factors.push("Analysis did not reach convergence".to_string());
    }
    let strong: Vec<String> = analysis
        .doubt_levels
        .iter()
        .filter(|level| level.doubt_strength > 0.6)
        .map(|level| level.level.to_string())
        .collect();
    if !strong.is_empty() {
        factors.push(format!("Strong doubts at levels: {}", strong.join(", ")));
    }
    factors
}

/// Coarse certainty label used in reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CertaintyBand {
    /// Above the configured high-certainty threshold.
    High,
    /// Above 0.6.
    Medium,
    /// Everything else.
    Low,
}

impl CertaintyBand {
    /// Bands `score` against `high_threshold` and 0.6.
    #[must_use]
    pub fn classify(score: f64, high_threshold: f64) -> Self {
        if score > high_threshold {
            Self::High
        } else if score > 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for CertaintyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        })
    }
}

/// Output of the secondary entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertaintyAssessment {
    /// Statement assessed.
    pub statement: String,
    /// Context echoed back.
    pub context: EvidenceContext,
    /// Overall certainty of the underlying depth-3 analysis.
    pub certainty_score: f64,
    /// Reasons for residual doubt.
    pub uncertainty_factors: Vec<String>,
    /// Spread of per-level certainty.
    pub confidence_intervals: ConfidenceIntervals,
    /// Recommendations of the underlying analysis.
    pub doubt_recommendations: Vec<Recommendation>,
    /// Band of `certainty_score`.
    pub band: CertaintyBand,
}

impl CertaintyAssessment {
    /// Post-processes a completed analysis.
    #[must_use]
    pub fn from_analysis(
        statement: impl Into<String>,
        context: EvidenceContext,
        analysis: &AnalysisResult,
        high_threshold: f64,
    ) -> Self {
        Self {
            statement: statement.into(),
            context,
            certainty_score: analysis.overall_certainty,
            uncertainty_factors: uncertainty_factors(analysis),
            confidence_intervals: ConfidenceIntervals::from_analysis(analysis),
            doubt_recommendations: analysis.recommendations.clone(),
            band: CertaintyBand::classify(analysis.overall_certainty, high_threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analyzer::ResolutionApproach, engine::AnalysisInput};

    fn record(level: u8, certainty: f64, doubt: f64, insights: usize) -> LevelRecord {
        LevelRecord {
            level,
            name: String::new(),
            description: String::new(),
            doubt_questions: Vec::new(),
            certainty_assessment: certainty,
            doubt_strength: doubt,
            insights: vec!["insight".to_string(); insights],
            resolution_approach: ResolutionApproach::ReasonableCertainty,
        }
    }

    #[test]
    fn level_factors_apply() {
        let base = 0.5 - 0.4 * 0.3 + 0.2;
        assert!((update_certainty(0.5, &record(1, 0.5, 0.4, 2)) - base * 0.9).abs() < 1e-12);
        assert!((update_certainty(0.5, &record(2, 0.5, 0.4, 2)) - base * 1.1).abs() < 1e-12);
        assert!((update_certainty(0.5, &record(4, 0.5, 0.4, 2)) - base).abs() < 1e-12);
        assert!((update_certainty(0.5, &record(7, 0.5, 0.4, 2)) - base * 0.8).abs() < 1e-12);
    }

    #[test]
    fn certainty_is_clamped() {
        assert!(update_certainty(0.0, &record(3, 0.0, 1.0, 0)).abs() < f64::EPSILON);
        assert!((update_certainty(1.0, &record(2, 1.0, 0.0, 5)) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bands() {
        assert_eq!(CertaintyBand::classify(0.81, 0.8), CertaintyBand::High);
        assert_eq!(CertaintyBand::classify(0.8, 0.8), CertaintyBand::Medium);
        assert_eq!(CertaintyBand::classify(0.6, 0.8), CertaintyBand::Low);
    }

    #[test]
    fn intervals_and_factors_follow_levels() {
        let mut analysis = AnalysisResult::empty(AnalysisInput::new("claim"));
        analysis.overall_certainty = 0.5;
        analysis.doubt_levels = vec![record(1, 0.3, 0.65, 1), record(2, 0.7, 0.2, 1)];
        let intervals = ConfidenceIntervals::from_analysis(&analysis);
        assert!((intervals.standard_deviation - 0.2).abs() < 1e-12);
        assert!((intervals.confidence_95.lower - (0.5 - 0.392)).abs() < 1e-12);
        assert!((intervals.confidence_95.upper - (0.5 + 0.392)).abs() < 1e-12);

        let factors = uncertainty_factors(&analysis);
        assert_eq!(
            factors,
            vec![
                "Low overall certainty from doubt analysis",
                "Analysis did not reach convergence",
                "Strong doubts at levels: 1",
            ]
        );
    }
}
