use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::analyzer::ResolutionApproach;

/// Highest level on the ladder.
pub const MAX_LEVEL: u8 = 7;

/// Doubt-type tag attached to a level. The set is closed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DoubtType {
    /// Are the stated facts right?
    FactualAccuracy,
    /// Does the reasoning hold together?
    LogicalConsistency,
    /// Is the claim relevant in its context?
    ContextRelevance,
    /// What data backs the claim?
    EmpiricalEvidence,
    /// Was the method sound?
    MethodologicalSoundness,
    /// Can the result be reproduced?
    Reproducibility,
    /// How does complexity produce new properties?
    EmergenceMechanisms,
    /// Where does consciousness begin and end?
    ConsciousnessBoundaries,
    /// What is subjective experience?
    QualiaNature,
    /// Which biases shape the judgment?
    CognitiveBiases,
    /// Where does reasoning stop working?
    ReasoningLimits,
    /// Are we fooling ourselves?
    SelfDeception,
    /// Does the claim hold beyond its local setting?
    UniversalApplicability,
    /// What does it mean at cosmic scale?
    CosmicSignificance,
    /// Questions without final answers.
    EternalQuestions,
    /// Is doubting itself valid?
    MetaDoubtValidity,
    /// Paradoxes of self-reference.
    SelfReferenceParadox,
    /// Doubt that never terminates.
    InfiniteRegression,
    /// What is ultimately real?
    UltimateReality,
    /// Could only the self be known?
    SolipsismRisk,
    /// Is meaning possible at all?
    MeaningPossibility,
}

impl DoubtType {
    /// Every tag, in catalog order.
    pub const ALL: [Self; 21] = [
        Self::FactualAccuracy,
        Self::LogicalConsistency,
        Self::ContextRelevance,
        Self::EmpiricalEvidence,
        Self::MethodologicalSoundness,
        Self::Reproducibility,
        Self::EmergenceMechanisms,
        Self::ConsciousnessBoundaries,
        Self::QualiaNature,
        Self::CognitiveBiases,
        Self::ReasoningLimits,
        Self::SelfDeception,
        Self::UniversalApplicability,
        Self::CosmicSignificance,
        Self::EternalQuestions,
        Self::MetaDoubtValidity,
        Self::SelfReferenceParadox,
        Self::InfiniteRegression,
        Self::UltimateReality,
        Self::SolipsismRisk,
        Self::MeaningPossibility,
    ];

    /// Snake-case tag name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FactualAccuracy => "factual_accuracy",
            Self::LogicalConsistency => "logical_consistency",
            Self::ContextRelevance => "context_relevance",
            Self::EmpiricalEvidence => "empirical_evidence",
            Self::MethodologicalSoundness => "methodological_soundness",
            Self::Reproducibility => "reproducibility",
            Self::EmergenceMechanisms => "emergence_mechanisms",
            Self::ConsciousnessBoundaries => "consciousness_boundaries",
            Self::QualiaNature => "qualia_nature",
            Self::CognitiveBiases => "cognitive_biases",
            Self::ReasoningLimits => "reasoning_limits",
            Self::SelfDeception => "self_deception",
            Self::UniversalApplicability => "universal_applicability",
            Self::CosmicSignificance => "cosmic_significance",
            Self::EternalQuestions => "eternal_questions",
            Self::MetaDoubtValidity => "meta_doubt_validity",
            Self::SelfReferenceParadox => "self_reference_paradox",
            Self::InfiniteRegression => "infinite_regression",
            Self::UltimateReality => "ultimate_reality",
            Self::SolipsismRisk => "solipsism_risk",
            Self::MeaningPossibility => "meaning_possibility",
        }
    }
}

impl fmt::Display for DoubtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DoubtType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == raw)
            .ok_or_else(|| format!("unknown doubt type `{raw}`"))
    }
}

/// Static definition of one rung on the ladder.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DoubtLevelDefinition {
    /// 1-based level number.
    pub level: u8,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Tags whose questions are asked at this level, in order.
    pub doubt_types: &'static [DoubtType],
}

static CATALOG: [DoubtLevelDefinition; MAX_LEVEL as usize] = [
    DoubtLevelDefinition {
        level: 1,
        name: "Surface Understanding",
        description: "Basic comprehension and initial assumptions",
        doubt_types: &[
            DoubtType::FactualAccuracy,
            DoubtType::LogicalConsistency,
            DoubtType::ContextRelevance,
        ],
    },
    DoubtLevelDefinition {
        level: 2,
        name: "Scientific Foundation",
        description: "Empirical evidence and methodological rigor",
        doubt_types: &[
            DoubtType::EmpiricalEvidence,
            DoubtType::MethodologicalSoundness,
            DoubtType::Reproducibility,
        ],
    },
    DoubtLevelDefinition {
        level: 3,
        name: "Consciousness Emergence",
        description: "How consciousness arises from complexity",
        doubt_types: &[
            DoubtType::EmergenceMechanisms,
            DoubtType::ConsciousnessBoundaries,
            DoubtType::QualiaNature,
        ],
    },
    DoubtLevelDefinition {
        level: 4,
        name: "Human Reflection Capability",
        description: "Limits and reliability of human reasoning",
        doubt_types: &[
            DoubtType::CognitiveBiases,
            DoubtType::ReasoningLimits,
            DoubtType::SelfDeception,
        ],
    },
    DoubtLevelDefinition {
        level: 5,
        name: "Universal Implications",
        description: "Broader philosophical and cosmic consequences",
        doubt_types: &[
            DoubtType::UniversalApplicability,
            DoubtType::CosmicSignificance,
            DoubtType::EternalQuestions,
        ],
    },
    DoubtLevelDefinition {
        level: 6,
        name: "Recursive Self-Reference",
        description: "The doubt process doubting itself",
        doubt_types: &[
            DoubtType::MetaDoubtValidity,
            DoubtType::SelfReferenceParadox,
            DoubtType::InfiniteRegression,
        ],
    },
    DoubtLevelDefinition {
        level: 7,
        name: "Ultimate Doubt",
        description: "The bedrock of philosophical uncertainty",
        doubt_types: &[
            DoubtType::UltimateReality,
            DoubtType::SolipsismRisk,
            DoubtType::MeaningPossibility,
        ],
    },
];

/// Looks up a level; `None` outside `1..=7`.
#[must_use]
pub fn definition(level: u8) -> Option<&'static DoubtLevelDefinition> {
    level
        .checked_sub(1)
        .and_then(|idx| CATALOG.get(usize::from(idx)))
}

/// The full ladder in ascending order.
#[must_use]
pub fn catalog() -> &'static [DoubtLevelDefinition] {
    &CATALOG
}

/// Outcome of scrutinizing the statement at one level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LevelRecord {
    /// 1-based level number.
    pub level: u8,
    /// Level name from the catalog.
    pub name: String,
    /// Level description from the catalog.
    pub description: String,
    /// At most five challenge questions.
    pub doubt_questions: Vec<String>,
    /// Certainty carried into this level, before its own update.
    pub certainty_assessment: f64,
    /// How strongly the questions undermine confidence (0-1).
    pub doubt_strength: f64,
    /// Canned insights for the level.
    pub insights: Vec<String>,
    /// Suggested way forward.
    pub resolution_approach: ResolutionApproach,
}
