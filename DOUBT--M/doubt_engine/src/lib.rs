#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Recursive doubt kernel: walks a fixed ladder of scrutiny levels over a statement,
//! tracks certainty until consecutive levels converge, and derives fractal,
//! resonance and history-wide maturity metrics.

/// Level-by-level analysis and resolution classification.
pub mod analyzer;
/// Certainty updates and certainty assessments.
pub mod certainty;
/// Convergence detection between consecutive levels.
pub mod convergence;
/// Primary engine entry points.
pub mod engine;
/// Error taxonomy.
pub mod error;
/// Fractal dimension and PHI resonance metrics.
pub mod fractal;
/// Process-lifetime analysis history and aggregate statistics.
pub mod history;
/// Canned per-level insights.
pub mod insights;
/// Static doubt level catalog.
pub mod levels;
/// Challenge question templates.
pub mod questions;
/// Lexical challenge and complexity scoring.
pub mod scoring;
/// Multi-perspective convergence study.
pub mod study;
/// Consciousness implications and recommendations.
pub mod synthesis;

/// Engine options surfaced to operators.
#[path = "../options.rs"]
pub mod options;

/// Markdown rendering of analysis outputs.
#[path = "../report.rs"]
pub mod report;

/// Async runtime wrapping the engine with telemetry.
#[path = "../runtime.rs"]
pub mod runtime;

/// Logging and event telemetry for the doubt runtime.
#[path = "../telemetry.rs"]
pub mod telemetry;

pub use certainty::{CertaintyAssessment, ConfidenceIntervals, EvidenceContext};
pub use engine::{AnalysisContext, AnalysisInput, AnalysisResult, DoubtEngine};
pub use error::DoubtError;
pub use history::{DoubtStatistics, HistoryStore, MaturityLevel, RingHistory, UnboundedHistory};
pub use levels::{DoubtLevelDefinition, DoubtType, LevelRecord};
pub use options::{DoubtOptions, HistoryRetention};
pub use runtime::DoubtRuntime;
pub use study::{ConvergenceStudy, ConvergenceStudyReport};
pub use telemetry::{DoubtTelemetry, DoubtTelemetryBuilder};
