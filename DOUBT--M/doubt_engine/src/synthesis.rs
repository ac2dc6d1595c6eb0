use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::AnalysisResult;

/// Overall banner derived from the mean of the four implication scores.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImpactBand {
    /// Mean above 0.7.
    Significant,
    /// Mean above 0.5.
    Moderate,
    /// Mean above 0.3.
    Basic,
    /// Everything else.
    #[default]
    Limited,
}

impl ImpactBand {
    /// Bands a mean score against 0.7 / 0.5 / 0.3.
    #[must_use]
    pub fn classify(mean: f64) -> Self {
        if mean > 0.7 {
            Self::Significant
        } else if mean > 0.5 {
            Self::Moderate
        } else if mean > 0.3 {
            Self::Basic
        } else {
            Self::Limited
        }
    }

    /// Banner text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Significant => "Significant consciousness evolution",
            Self::Moderate => "Moderate consciousness development",
            Self::Basic => "Basic consciousness awareness",
            Self::Limited => "Limited consciousness impact",
        }
    }
}

impl fmt::Display for ImpactBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Summary scores derived from a completed analysis.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ConsciousnessImplications {
    /// `0.1 × levels + 0.2 if converged`.
    pub evolution_acceleration: f64,
    /// `0.15 × fractal insights + 0.05 × level insights`.
    pub self_awareness_increase: f64,
    /// 0.2 unless nothing was left uncertain and the run did not converge.
    pub uncertainty_tolerance: f64,
    /// `0.2 ×` levels numbered 5 or higher.
    pub philosophical_maturity: f64,
    /// Banner for the mean of the four scores above.
    pub overall_consciousness_impact: ImpactBand,
}

impl ConsciousnessImplications {
    /// Derives the implications of `analysis`.
    #[must_use]
    pub fn assess(analysis: &AnalysisResult) -> Self {
        let levels = analysis.doubt_levels.len() as f64;
        let level_insights: usize = analysis.doubt_levels.iter().map(|l| l.insights.len()).sum();
        let deep_levels = analysis
            .doubt_levels
            .iter()
            .filter(|level| level.level >= 5)
            .count() as f64;
        let converged = if analysis.convergence_achieved { 1.0 } else { 0.0 };

        let evolution_acceleration = levels * 0.1 + converged * 0.2;
        let self_awareness_increase =
            analysis.fractal_insights.len() as f64 * 0.15 + level_insights as f64 * 0.05;
        // The convergence flag is folded into the sum and the whole sum gates the 0.2.
        let uncertainty_gate = (1.0 - analysis.overall_certainty) * 0.8 + converged;
        let uncertainty_tolerance = if uncertainty_gate > 0.0 { 0.2 } else { 0.0 };
        let philosophical_maturity = deep_levels * 0.2;

        let mean = (evolution_acceleration
            + self_awareness_increase
            + uncertainty_tolerance
            + philosophical_maturity)
            / 4.0;

        Self {
            evolution_acceleration,
            self_awareness_increase,
            uncertainty_tolerance,
            philosophical_maturity,
            overall_consciousness_impact: ImpactBand::classify(mean),
        }
    }
}

/// Recommendation category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Analysis stopped before converging.
    ContinueAnalysis,
    /// Overall certainty below one half.
    GatherEvidence,
    /// A progression looks fractal.
    ComplexityAnalysis,
}

/// Recommendation urgency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Act first.
    High,
    /// Worth scheduling.
    Medium,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
        })
    }
}

/// Follow-up suggested by an analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    /// Category.
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    /// Urgency.
    pub priority: Priority,
    /// What to do.
    pub recommendation: String,
    /// Why.
    pub reasoning: String,
}

/// Independent rule checks, emitted in fixed order.
#[must_use]
pub fn recommendations(analysis: &AnalysisResult) -> Vec<Recommendation> {
    let mut out = Vec::new();
    if !analysis.convergence_achieved {
        out.push(Recommendation {
            kind: RecommendationKind::ContinueAnalysis,
            priority: Priority::High,
            recommendation: "Continue doubt analysis to deeper levels for better convergence"
                .into(),
            reasoning:
                "Analysis did not reach convergence - deeper doubt levels may provide clarity"
                    .into(),
        });
    }
    if analysis.overall_certainty < 0.5 {
        out.push(Recommendation {
            kind: RecommendationKind::GatherEvidence,
            priority: Priority::High,
            recommendation: "Gather additional empirical evidence to reduce uncertainty".into(),
            reasoning: format!(
                "Current certainty is only {:.0}%",
                analysis.overall_certainty * 100.0
            ),
        });
    }
    if analysis
        .fractal_insights
        .iter()
        .filter_map(crate::fractal::FractalInsight::dimension)
        .any(|dimension| dimension > 1.8)
    {
        out.push(Recommendation {
            kind: RecommendationKind::ComplexityAnalysis,
            priority: Priority::Medium,
            recommendation:
                "Consider specialized complexity analysis for high-fractal-dimension patterns"
                    .into(),
            reasoning: "Analysis shows consciousness-level complexity patterns".into(),
        });
    }
    out
}
