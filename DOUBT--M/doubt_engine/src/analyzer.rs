use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    insights::level_insights,
    levels::{definition, LevelRecord},
    questions,
    scoring::assess_doubt_strength,
};

/// How a level's doubts should be resolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionApproach {
    /// Doubt strength above 0.7.
    ParadigmShift,
    /// Doubt strength above 0.5.
    FurtherResearch,
    /// Carried-in certainty below 0.3.
    DeeperDoubt,
    /// Nothing pressing.
    ReasonableCertainty,
}

impl ResolutionApproach {
    /// Picks an approach from the level's doubt strength and carried-in certainty.
    #[must_use]
    pub fn classify(doubt_strength: f64, certainty: f64) -> Self {
        if doubt_strength > 0.7 {
            Self::ParadigmShift
        } else if doubt_strength > 0.5 {
            Self::FurtherResearch
        } else if certainty < 0.3 {
            Self::DeeperDoubt
        } else {
            Self::ReasonableCertainty
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ParadigmShift => "Requires fundamental paradigm shift or new evidence",
            Self::FurtherResearch => "Needs additional research and validation",
            Self::DeeperDoubt => "High uncertainty - further doubt analysis recommended",
            Self::ReasonableCertainty => "Reasonable certainty achieved at this level",
        }
    }
}

impl fmt::Display for ResolutionApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Produces one [`LevelRecord`] per rung.
#[derive(Debug, Default, Clone, Copy)]
pub struct LevelAnalyzer;

impl LevelAnalyzer {
    /// Scrutinizes `statement` at `level` with the certainty carried in from the previous level.
    ///
    /// Returns `None` for levels outside the catalog.
    #[must_use]
    pub fn analyze(
        &self,
        statement: &str,
        level: u8,
        carried_certainty: f64,
    ) -> Option<LevelRecord> {
        let def = definition(level)?;
        let doubt_questions = questions::generate(def.doubt_types);
        let doubt_strength = assess_doubt_strength(&doubt_questions, statement);
        let insights = level_insights(level, &doubt_questions);
        Some(LevelRecord {
            level,
            name: def.name.to_string(),
            description: def.description.to_string(),
            doubt_questions,
            certainty_assessment: carried_certainty,
            doubt_strength,
            insights,
            resolution_approach: ResolutionApproach::classify(doubt_strength, carried_certainty),
        })
    }
}
