use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    analyzer::LevelAnalyzer,
    certainty::{
        update_certainty, CertaintyAssessment, EvidenceContext, ASSESSMENT_DEPTH, NEUTRAL_PRIOR,
    },
    convergence::{ConvergenceDetector, ConvergencePattern},
    error::DoubtError,
    fractal::{FractalAnalyzer, FractalInsight},
    history::{DoubtStatistics, HistoryAggregator, HistoryStore},
    levels::{LevelRecord, MAX_LEVEL},
    options::DoubtOptions,
    synthesis::{recommendations, ConsciousnessImplications, Recommendation},
};

/// Background accompanying a statement.
///
/// Objects holding only `evidence`/`methodology` keys decode as [`Self::Evidence`];
/// any other JSON value is kept verbatim as [`Self::Structured`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AnalysisContext {
    /// Background as prose.
    Text(String),
    /// Evidence list and methodology.
    Evidence(EvidenceContext),
    /// Any other structured background.
    Structured(serde_json::Value),
}

/// Request for the primary entry point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisInput {
    /// Statement to doubt; must not be blank. A missing statement decodes as empty.
    #[serde(default)]
    pub statement: String,
    /// Optional background. Carried through untouched; scoring reads only the statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<AnalysisContext>,
    /// Requested levels, clamped to `1..=7`. Defaults to the configured maximum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

impl AnalysisInput {
    /// Input with no context and default depth.
    #[must_use]
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            context: None,
            depth: None,
        }
    }

    /// Sets the requested depth.
    #[must_use]
    pub const fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Sets the context.
    #[must_use]
    pub fn with_context(mut self, context: AnalysisContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Levels to walk given the configured ceiling.
    #[must_use]
    pub fn effective_depth(&self, max_depth: u8) -> u8 {
        let ceiling = max_depth.clamp(1, MAX_LEVEL);
        let requested = self.depth.map_or(ceiling, |depth| {
            u8::try_from(depth.clamp(1, u32::from(MAX_LEVEL))).unwrap_or(MAX_LEVEL)
        });
        requested.min(ceiling)
    }
}

/// Completed multi-level analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Correlation id.
    pub id: Uuid,
    /// Request as received.
    pub input: AnalysisInput,
    /// Start time.
    pub timestamp: DateTime<Utc>,
    /// One record per processed level.
    pub doubt_levels: Vec<LevelRecord>,
    /// Certainty after the last processed level.
    pub overall_certainty: f64,
    /// Whether two consecutive levels stabilized.
    pub convergence_achieved: bool,
    /// Level at which convergence was first detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convergence_point: Option<u8>,
    /// Certainty fractal, doubt fractal and PHI resonance, when enabled.
    pub fractal_insights: Vec<FractalInsight>,
    /// Derived summary scores.
    pub consciousness_implications: ConsciousnessImplications,
    /// Follow-up suggestions.
    pub recommendations: Vec<Recommendation>,
}

impl AnalysisResult {
    pub(crate) fn empty(input: AnalysisInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            input,
            timestamp: Utc::now(),
            doubt_levels: Vec::new(),
            overall_certainty: 0.0,
            convergence_achieved: false,
            convergence_point: None,
            fractal_insights: Vec::new(),
            consciousness_implications: ConsciousnessImplications::default(),
            recommendations: Vec::new(),
        }
    }
}

/// Synchronous doubt engine. Shareable across threads; the history store handles locking.
#[derive(Debug, Clone)]
pub struct DoubtEngine {
    options: DoubtOptions,
    analyzer: LevelAnalyzer,
    detector: ConvergenceDetector,
    fractal: FractalAnalyzer,
    history: Arc<dyn HistoryStore>,
}

impl DoubtEngine {
    /// Builds an engine with the history store selected by `options.history`.
    pub fn new(options: DoubtOptions) -> Result<Self, DoubtError> {
        let history = options.history.build();
        Self::with_history(options, history)
    }

    /// Builds an engine around an injected history store.
    pub fn with_history(
        options: DoubtOptions,
        history: Arc<dyn HistoryStore>,
    ) -> Result<Self, DoubtError> {
        options.validate()?;
        Ok(Self {
            detector: ConvergenceDetector::new(options.convergence_threshold),
            analyzer: LevelAnalyzer,
            fractal: FractalAnalyzer,
            options,
            history,
        })
    }

    /// Options in effect.
    #[must_use]
    pub const fn options(&self) -> &DoubtOptions {
        &self.options
    }

    /// History store backing statistics.
    #[must_use]
    pub const fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    /// Walks the level ladder over `input.statement`, stopping early on convergence.
    ///
    /// The result is committed to history only once it is complete.
    pub fn analyze(&self, input: AnalysisInput) -> Result<AnalysisResult, DoubtError> {
        if input.statement.trim().is_empty() {
            return Err(DoubtError::InvalidInput("statement must not be empty".into()));
        }
        let depth = input.effective_depth(self.options.max_depth);
        let mut analysis = AnalysisResult::empty(input);
        let mut certainty = NEUTRAL_PRIOR;
        let mut convergence: Option<ConvergencePattern> = None;

        for level in 1..=depth {
            let Some(record) = self
                .analyzer
                .analyze(&analysis.input.statement, level, certainty)
            else {
                break;
            };
            certainty = update_certainty(certainty, &record);
            analysis.doubt_levels.push(record);

            if let [.., previous, current] = analysis.doubt_levels.as_slice() {
                if let Some(pattern) = self.detector.detect(previous, current) {
                    analysis.convergence_point = Some(level);
                    convergence = Some(pattern);
                    break;
                }
            }
        }

        analysis.overall_certainty = certainty;
        analysis.convergence_achieved = convergence.is_some();
        if self.options.fractal_analysis {
            analysis.fractal_insights = self.fractal.analyze(&analysis.doubt_levels);
        }
        analysis.consciousness_implications = ConsciousnessImplications::assess(&analysis);
        analysis.recommendations = recommendations(&analysis);

        self.history.append(analysis.clone(), convergence);
        Ok(analysis)
    }

    /// Depth-3 analysis post-processed into a certainty score with confidence intervals.
    pub fn assess_certainty(
        &self,
        statement: &str,
        context: Option<EvidenceContext>,
    ) -> Result<CertaintyAssessment, DoubtError> {
        let context = context.unwrap_or_default();
        let analysis = self.analyze(
            AnalysisInput::new(statement)
                .with_context(AnalysisContext::Evidence(context.clone()))
                .with_depth(ASSESSMENT_DEPTH),
        )?;
        Ok(CertaintyAssessment::from_analysis(
            statement,
            context,
            &analysis,
            self.options.certainty_threshold,
        ))
    }

    /// Aggregate statistics over the retained history; never fails.
    #[must_use]
    pub fn statistics(&self) -> DoubtStatistics {
        HistoryAggregator.statistics(&self.history.digest())
    }
}
