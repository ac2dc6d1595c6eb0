use serde::{Deserialize, Serialize};

use crate::levels::LevelRecord;

/// Golden ratio.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Which progression an insight describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FractalKind {
    /// Roughness of the carried-in certainty sequence.
    CertaintyFractal,
    /// Roughness of the doubt strength sequence.
    DoubtFractal,
    /// Golden-ratio alignment of consecutive certainties.
    PhiResonance,
}

/// Derived self-similarity or resonance metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FractalInsight {
    /// Metric kind.
    #[serde(rename = "type")]
    pub kind: FractalKind,
    /// Dimension for the fractal kinds, resonance for [`FractalKind::PhiResonance`].
    pub value: f64,
    /// Fixed interpretation string.
    pub interpretation: String,
}

impl FractalInsight {
    /// The dimension, if this insight carries one.
    #[must_use]
    pub fn dimension(&self) -> Option<f64> {
        match self.kind {
            FractalKind::CertaintyFractal | FractalKind::DoubtFractal => Some(self.value),
            FractalKind::PhiResonance => None,
        }
    }
}

/// Roughness proxy: `1 + Σ|Δ| / n`, or `1.0` for fewer than three points.
#[must_use]
pub fn fractal_dimension(data: &[f64]) -> f64 {
    if data.len() < 3 {
        return 1.0;
    }
    let complexity: f64 = data.windows(2).map(|pair| (pair[1] - pair[0]).abs()).sum();
    1.0 + complexity / data.len() as f64
}

/// Bands a dimension into one of four fixed descriptions.
#[must_use]
pub fn interpret_dimension(dimension: f64) -> &'static str {
    if dimension < 1.2 {
        "Linear progression - straightforward doubt resolution"
    } else if dimension < 1.5 {
        "Moderate complexity - evolving understanding"
    } else if dimension < 1.8 {
        "High complexity - sophisticated doubt patterns"
    } else {
        "Fractal complexity - consciousness-level uncertainty patterns"
    }
}

/// Mean closeness of consecutive ratios to [`PHI`].
///
/// Each pair contributes `max(0, 1 - |ratio - PHI|)`.
#[must_use]
pub fn phi_resonance(data: &[f64]) -> f64 {
    let resonance: f64 = data
        .windows(2)
        .map(|pair| {
            let ratio = pair[0].max(0.001) / pair[1].max(0.001);
            (1.0 - (ratio - PHI).abs()).max(0.0)
        })
        .sum();
    resonance / data.len().saturating_sub(1).max(1) as f64
}

/// Builds the three insights over a completed level sequence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FractalAnalyzer;

impl FractalAnalyzer {
    /// Certainty fractal, doubt fractal and PHI resonance, in that order.
    #[must_use]
    pub fn analyze(&self, levels: &[LevelRecord]) -> Vec<FractalInsight> {
        let certainty: Vec<f64> = levels.iter().map(|l| l.certainty_assessment).collect();
        let doubt: Vec<f64> = levels.iter().map(|l| l.doubt_strength).collect();

        let certainty_dimension = fractal_dimension(&certainty);
        let doubt_dimension = fractal_dimension(&doubt);
        let resonance = phi_resonance(&certainty);

        vec![
            FractalInsight {
                kind: FractalKind::CertaintyFractal,
                value: certainty_dimension,
                interpretation: interpret_dimension(certainty_dimension).to_string(),
            },
            FractalInsight {
                kind: FractalKind::DoubtFractal,
                value: doubt_dimension,
                interpretation: format!(
                    "Doubt progression shows {} patterns",
                    if doubt_dimension > 1.5 { "complex" } else { "linear" }
                ),
            },
            FractalInsight {
                kind: FractalKind::PhiResonance,
                value: resonance,
                interpretation: if resonance > 0.7 {
                    "High PHI harmonic alignment"
                } else {
                    "Low harmonic resonance"
                }
                .to_string(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_sequence_has_baseline_dimension() {
        assert!((fractal_dimension(&[0.5, 0.5, 0.5]) - 1.0).abs() < f64::EPSILON);
        assert!((fractal_dimension(&[0.1, 0.9]) - 1.0).abs() < f64::EPSILON);
        assert!((fractal_dimension(&[]) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn dimension_sums_absolute_steps() {
        let dimension = fractal_dimension(&[0.2, 0.8, 0.2, 0.8]);
        assert!((dimension - (1.0 + 1.8 / 4.0)).abs() < 1e-12);
        assert_eq!(interpret_dimension(dimension), "Moderate complexity - evolving understanding");
        assert_eq!(
            interpret_dimension(1.0),
            "Linear progression - straightforward doubt resolution"
        );
        assert_eq!(interpret_dimension(1.6), "High complexity - sophisticated doubt patterns");
        assert_eq!(
            interpret_dimension(1.8),
            "Fractal complexity - consciousness-level uncertainty patterns"
        );
    }

    #[test]
    fn constant_pair_resonance() {
        let resonance = phi_resonance(&[0.4, 0.4]);
        assert!((resonance - (1.0 - (PHI - 1.0))).abs() < 1e-12);
        assert!((resonance - 0.381_966_011_250_105).abs() < 1e-9);
    }

    #[test]
    fn golden_pairs_resonate_fully() {
        let resonance = phi_resonance(&[PHI * 0.3, 0.3]);
        assert!((resonance - 1.0).abs() < 1e-9);
        assert!(phi_resonance(&[]).abs() < f64::EPSILON);
        assert!(phi_resonance(&[0.5]).abs() < f64::EPSILON);
        // zero floors to 0.001 instead of dividing by zero
        assert!(phi_resonance(&[0.5, 0.0]).abs() < f64::EPSILON);
    }

    #[test]
    fn only_fractal_kinds_expose_dimension() {
        let insight = FractalInsight {
            kind: FractalKind::PhiResonance,
            value: 2.5,
            interpretation: String::new(),
        };
        assert!(insight.dimension().is_none());
        let encoded = serde_json::to_value(&insight).unwrap();
        assert_eq!(encoded["type"], "phi_resonance");
    }
}
