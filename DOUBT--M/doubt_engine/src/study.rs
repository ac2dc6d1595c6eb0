use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    engine::{AnalysisContext, AnalysisInput, AnalysisResult, DoubtEngine},
    error::DoubtError,
};

const TOPIC_DEPTH: u32 = 7;
const PERSPECTIVE_DEPTH: u32 = 5;
const CONVERGED_ABOVE: f64 = 0.8;

/// A topic examined alongside a set of perspectives on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConvergenceStudy {
    /// Main statement, analyzed at depth 7.
    pub topic: String,
    /// Competing statements, each analyzed at depth 5.
    #[serde(default)]
    pub perspectives: Vec<String>,
    /// Framework label echoed into the report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub philosophical_framework: Option<String>,
}

impl ConvergenceStudy {
    /// Study of `topic` with no perspectives.
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    /// Adds a perspective.
    #[must_use]
    pub fn perspective(mut self, perspective: impl Into<String>) -> Self {
        self.perspectives.push(perspective.into());
        self
    }

    /// Sets the framework label.
    #[must_use]
    pub fn framework(mut self, framework: impl Into<String>) -> Self {
        self.philosophical_framework = Some(framework.into());
        self
    }
}

/// Banded `(convergence + alignment) / 2`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EvolutionPotential {
    /// Above 0.7.
    High,
    /// Above 0.5.
    Moderate,
    /// Everything else.
    Basic,
}

impl EvolutionPotential {
    /// Bands a potential score.
    #[must_use]
    pub fn classify(potential: f64) -> Self {
        if potential > 0.7 {
            Self::High
        } else if potential > 0.5 {
            Self::Moderate
        } else {
            Self::Basic
        }
    }
}

impl fmt::Display for EvolutionPotential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "High potential for consciousness advancement",
            Self::Moderate => "Moderate consciousness development opportunity",
            Self::Basic => "Basic consciousness awareness building",
        })
    }
}

/// Agreement between the topic and its perspectives.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConvergenceMetrics {
    /// `1 - population standard deviation` of the overall certainties.
    pub overall_convergence: f64,
    /// Mean overall certainty.
    pub perspective_alignment: f64,
    /// `overall_convergence > 0.8`.
    pub convergence_achieved: bool,
    /// `(overall_convergence + perspective_alignment) / 2`.
    pub evolution_potential: f64,
    /// Band of `evolution_potential`.
    pub potential: EvolutionPotential,
}

impl ConvergenceMetrics {
    /// Metrics over a non-empty list of certainties; an empty list counts as one neutral zero.
    #[must_use]
    pub fn from_certainties(certainties: &[f64]) -> Self {
        let count = certainties.len().max(1) as f64;
        let mean = certainties.iter().sum::<f64>() / count;
        let variance = certainties.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / count;
        let overall_convergence = 1.0 - variance.sqrt();
        let evolution_potential = (overall_convergence + mean) / 2.0;
        Self {
            overall_convergence,
            perspective_alignment: mean,
            convergence_achieved: overall_convergence > CONVERGED_ABOVE,
            evolution_potential,
            potential: EvolutionPotential::classify(evolution_potential),
        }
    }
}

/// Outcome of a [`ConvergenceStudy`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceStudyReport {
    /// Study as requested.
    pub study: ConvergenceStudy,
    /// Depth-7 analysis of the topic.
    pub topic_analysis: AnalysisResult,
    /// Depth-5 analyses, one per perspective in request order.
    pub perspective_analyses: Vec<AnalysisResult>,
    /// Agreement metrics over topic and perspectives.
    pub metrics: ConvergenceMetrics,
}

impl ConvergenceStudyReport {
    /// Framework label, defaulting to `UEF-Aligned`.
    #[must_use]
    pub fn framework(&self) -> &str {
        self.study
            .philosophical_framework
            .as_deref()
            .unwrap_or("UEF-Aligned")
    }
}

impl DoubtEngine {
    /// Analyzes the topic and every perspective, then measures their agreement.
    ///
    /// Every analysis is recorded in history. A blank topic fails before anything is recorded;
    /// a blank perspective fails after the topic and earlier perspectives were recorded.
    pub fn study(&self, study: &ConvergenceStudy) -> Result<ConvergenceStudyReport, DoubtError> {
        if study.topic.trim().is_empty() {
            return Err(DoubtError::InvalidInput("study topic must not be empty".into()));
        }
        let topic_analysis = self.analyze(
            AnalysisInput::new(study.topic.clone())
                .with_context(AnalysisContext::Text(
                    "Convergence analysis across multiple perspectives".into(),
                ))
                .with_depth(TOPIC_DEPTH),
        )?;
        let perspective_analyses = study
            .perspectives
            .iter()
            .map(|perspective| {
                self.analyze(
                    AnalysisInput::new(perspective.clone())
                        .with_context(AnalysisContext::Text(format!(
                            "Perspective on: {}",
                            study.topic
                        )))
                        .with_depth(PERSPECTIVE_DEPTH),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let certainties: Vec<f64> = std::iter::once(&topic_analysis)
            .chain(&perspective_analyses)
            .map(|analysis| analysis.overall_certainty)
            .collect();

        Ok(ConvergenceStudyReport {
            study: study.clone(),
            metrics: ConvergenceMetrics::from_certainties(&certainties),
            topic_analysis,
            perspective_analyses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DoubtOptions;

    #[test]
    fn metrics_over_known_certainties() {
        let metrics = ConvergenceMetrics::from_certainties(&[0.4, 0.6]);
        assert!((metrics.perspective_alignment - 0.5).abs() < 1e-9);
        assert!((metrics.overall_convergence - 0.9).abs() < 1e-9);
        assert!(metrics.convergence_achieved);
        assert!((metrics.evolution_potential - 0.7).abs() < 1e-9);
        assert_eq!(metrics.potential, EvolutionPotential::Moderate);

        let spread = ConvergenceMetrics::from_certainties(&[0.0, 1.0]);
        assert!((spread.overall_convergence - 0.5).abs() < 1e-9);
        assert!(!spread.convergence_achieved);
        assert_eq!(spread.potential, EvolutionPotential::Basic);

        let single = ConvergenceMetrics::from_certainties(&[0.9]);
        assert!((single.overall_convergence - 1.0).abs() < 1e-9);
        assert_eq!(single.potential, EvolutionPotential::High);
    }

    #[test]
    fn study_records_every_analysis() {
        let engine = DoubtEngine::new(DoubtOptions::default()).unwrap();
        let study = ConvergenceStudy::new("Consciousness is fundamental")
            .perspective("The brain produces the mind")
            .perspective("Evidence suggests awareness emerges from matter");
        let report = engine.study(&study).unwrap();

        assert_eq!(report.perspective_analyses.len(), 2);
        assert_eq!(report.topic_analysis.input.depth, Some(7));
        assert!(report
            .perspective_analyses
            .iter()
            .all(|analysis| analysis.input.depth == Some(5)));
        assert_eq!(
            report.perspective_analyses[0].input.context,
            Some(AnalysisContext::Text(
                "Perspective on: Consciousness is fundamental".into()
            ))
        );
        assert_eq!(report.framework(), "UEF-Aligned");
        assert_eq!(engine.statistics().total_analyses, 3);

        let expected = ConvergenceMetrics::from_certainties(&[
            report.topic_analysis.overall_certainty,
            report.perspective_analyses[0].overall_certainty,
            report.perspective_analyses[1].overall_certainty,
        ]);
        assert_eq!(report.metrics, expected);
    }

    #[test]
    fn blank_topic_is_rejected() {
        let engine = DoubtEngine::new(DoubtOptions::default()).unwrap();
        let err = engine.study(&ConvergenceStudy::new("  ").perspective("x")).unwrap_err();
        assert!(matches!(err, DoubtError::InvalidInput(_)));
        assert_eq!(engine.statistics().total_analyses, 0);
    }

    #[test]
    fn framework_label_is_echoed() {
        let engine = DoubtEngine::new(DoubtOptions::default()).unwrap();
        let report = engine
            .study(&ConvergenceStudy::new("Truth is knowable").framework("Pragmatism"))
            .unwrap();
        assert_eq!(report.framework(), "Pragmatism");
        assert!(report.perspective_analyses.is_empty());
        assert!((report.metrics.overall_convergence - 1.0).abs() < 1e-9);
    }
}
