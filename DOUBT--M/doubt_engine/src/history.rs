use std::{collections::VecDeque, fmt};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::{convergence::ConvergencePattern, engine::AnalysisResult, levels::MAX_LEVEL};

/// One analysis as committed to history, with the convergence it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Completed analysis.
    pub analysis: AnalysisResult,
    /// Convergence event raised while producing it.
    pub convergence: Option<ConvergencePattern>,
}

/// Per-analysis fields the aggregate statistics depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisDigest {
    /// Overall certainty.
    pub overall_certainty: f64,
    /// Number of levels processed.
    pub levels: usize,
    /// Convergence flag.
    pub converged: bool,
    /// Number of fractal insights attached.
    pub fractal_insights: usize,
    /// Evolution acceleration implication.
    pub evolution_acceleration: f64,
}

impl From<&AnalysisResult> for AnalysisDigest {
    fn from(analysis: &AnalysisResult) -> Self {
        Self {
            overall_certainty: analysis.overall_certainty,
            levels: analysis.doubt_levels.len(),
            converged: analysis.convergence_achieved,
            fractal_insights: analysis.fractal_insights.len(),
            evolution_acceleration: analysis.consciousness_implications.evolution_acceleration,
        }
    }
}

/// Consistent view of a history store taken under one lock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryDigest {
    /// Retained analyses, oldest first.
    pub analyses: Vec<AnalysisDigest>,
    /// Retained convergence events.
    pub convergence_events: usize,
}

impl HistoryDigest {
    fn from_entries<'a>(entries: impl IntoIterator<Item = &'a HistoryEntry>) -> Self {
        let mut digest = Self::default();
        for entry in entries {
            digest.analyses.push(AnalysisDigest::from(&entry.analysis));
            if entry.convergence.is_some() {
                digest.convergence_events += 1;
            }
        }
        digest
    }
}

/// Storage for completed analyses. Implementations must be safe to share across threads.
pub trait HistoryStore: Send + Sync + fmt::Debug {
    /// Commits an analysis and the convergence event it raised, if any.
    fn append(&self, analysis: AnalysisResult, convergence: Option<ConvergencePattern>);

    /// Number of retained analyses.
    fn len(&self) -> usize;

    /// Whether nothing is retained.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the fields used for statistics.
    fn digest(&self) -> HistoryDigest;

    /// Up to `limit` most recent entries, newest first.
    fn recent(&self, limit: usize) -> Vec<HistoryEntry>;
}

/// Append-only history that never evicts.
#[derive(Debug, Default)]
pub struct UnboundedHistory {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl UnboundedHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for UnboundedHistory {
    fn append(&self, analysis: AnalysisResult, convergence: Option<ConvergencePattern>) {
        self.entries.write().push(HistoryEntry {
            analysis,
            convergence,
        });
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn digest(&self) -> HistoryDigest {
        HistoryDigest::from_entries(self.entries.read().iter())
    }

    fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        self.entries.read().iter().rev().take(limit).cloned().collect()
    }
}

/// Keeps only the most recent `capacity` analyses; convergence events leave with their analysis.
#[derive(Debug)]
pub struct RingHistory {
    capacity: usize,
    entries: RwLock<VecDeque<HistoryEntry>>,
}

impl RingHistory {
    /// Creates a ring holding at least one entry.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }
}

impl HistoryStore for RingHistory {
    fn append(&self, analysis: AnalysisResult, convergence: Option<ConvergencePattern>) {
        let mut entries = self.entries.write();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(HistoryEntry {
            analysis,
            convergence,
        });
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn digest(&self) -> HistoryDigest {
        HistoryDigest::from_entries(self.entries.read().iter())
    }

    fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        self.entries.read().iter().rev().take(limit).cloned().collect()
    }
}

/// Six maturity tiers keyed off the evolution index.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLevel {
    /// Below 30.
    #[default]
    Beginner,
    /// 30 and up.
    Developing,
    /// 50 and up.
    Intermediate,
    /// 65 and up.
    Advanced,
    /// 75 and up.
    Master,
    /// 85 and up.
    Transcendent,
}

impl MaturityLevel {
    /// Tier for an evolution index.
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        match index {
            85.. => Self::Transcendent,
            75..=84 => Self::Master,
            65..=74 => Self::Advanced,
            50..=64 => Self::Intermediate,
            30..=49 => Self::Developing,
            _ => Self::Beginner,
        }
    }
}

impl fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Beginner => "beginner",
            Self::Developing => "developing",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Master => "master",
            Self::Transcendent => "transcendent",
        })
    }
}

/// Aggregate view over every retained analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DoubtStatistics {
    /// Retained analyses.
    pub total_analyses: usize,
    /// Convergence events per analysis.
    pub convergence_rate: f64,
    /// Mean overall certainty.
    pub average_certainty: f64,
    /// Levels processed across all analyses.
    pub doubt_levels_processed: usize,
    /// Primary composite index (0-100).
    pub consciousness_evolution_index: u32,
    /// Tier of the evolution index.
    pub doubt_maturity_level: MaturityLevel,
    /// Mean per-analysis depth score (0-100).
    pub philosophical_depth_score: u32,
    /// Convergence and certainty weighted capability (0-100).
    pub truth_discovery_capability: u32,
    /// Depth, volume and convergence weighted potential (0-100).
    pub consciousness_acceleration_potential: u32,
}

/// Computes [`DoubtStatistics`] from a [`HistoryDigest`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HistoryAggregator;

impl HistoryAggregator {
    /// All-zero statistics for an empty digest; never fails.
    #[must_use]
    pub fn statistics(&self, digest: &HistoryDigest) -> DoubtStatistics {
        let analyses = &digest.analyses;
        if analyses.is_empty() {
            return DoubtStatistics::default();
        }
        let total = analyses.len() as f64;
        let convergence_rate = digest.convergence_events as f64 / total;
        let average_certainty =
            analyses.iter().map(|a| a.overall_certainty).sum::<f64>() / total;
        let doubt_levels_processed = analyses.iter().map(|a| a.levels).sum();
        let max_depth = analyses.iter().map(|a| a.levels).max().unwrap_or(0);
        let depth_ratio = max_depth as f64 / f64::from(MAX_LEVEL);

        let philosophical_bonus = analyses.iter().filter(|a| a.levels >= 6).count() as f64 * 3.0;
        let stability_bonus = if digest.convergence_events > 1 { 5.0 } else { 0.0 };
        let evolution_index = bounded_index(
            convergence_rate * 25.0
                + average_certainty * 25.0
                + depth_ratio * 30.0
                + philosophical_bonus
                + stability_bonus,
        );

        let philosophical_indicators =
            analyses.iter().map(depth_indicator).sum::<f64>() / total;

        let converged_count = analyses.iter().filter(|a| a.converged).count() as f64;
        let ultimate_bonus = if max_depth >= usize::from(MAX_LEVEL) { 10.0 } else { 0.0 };
        let truth_discovery = bounded_index(
            convergence_rate * 35.0
                + average_certainty * 35.0
                + converged_count * 5.0
                + ultimate_bonus,
        );

        let acceleration = bounded_index(
            depth_ratio * 25.0
                + total * 3.0
                + convergence_rate * 35.0
                + average_certainty * 25.0
                + philosophical_indicators * 0.1,
        );

        DoubtStatistics {
            total_analyses: analyses.len(),
            convergence_rate,
            average_certainty,
            doubt_levels_processed,
            consciousness_evolution_index: evolution_index,
            doubt_maturity_level: MaturityLevel::from_index(evolution_index),
            philosophical_depth_score: bounded_index(philosophical_indicators),
            truth_discovery_capability: truth_discovery,
            consciousness_acceleration_potential: acceleration,
        }
    }
}

fn depth_indicator(analysis: &AnalysisDigest) -> f64 {
    // Every analysis carries implications, hence the unconditional 25.
    let mut score = 25.0;
    if analysis.converged {
        score += 20.0;
    }
    if analysis.fractal_insights > 0 {
        score += 30.0;
    }
    if analysis.levels >= 5 {
        score += 25.0;
    }
    if analysis.levels >= usize::from(MAX_LEVEL) {
        score += 10.0;
    }
    if analysis.evolution_acceleration > 0.5 {
        score += 15.0;
    }
    score
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bounded_index(raw: f64) -> u32 {
    raw.round().clamp(0.0, 100.0) as u32
}
