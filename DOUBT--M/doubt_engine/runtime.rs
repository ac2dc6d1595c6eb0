//! Async runtime wrapping the doubt engine with logging and event publication.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use shared_logging::LogLevel;

use crate::{
    certainty::{CertaintyAssessment, EvidenceContext},
    engine::{AnalysisInput, AnalysisResult, DoubtEngine},
    history::DoubtStatistics,
    options::DoubtOptions,
    study::{ConvergenceStudy, ConvergenceStudyReport},
    telemetry::DoubtTelemetry,
};

/// Cloneable front door to a shared [`DoubtEngine`].
#[derive(Debug, Clone)]
pub struct DoubtRuntime {
    engine: Arc<DoubtEngine>,
    telemetry: Option<DoubtTelemetry>,
}

impl DoubtRuntime {
    /// Creates a runtime over a fresh engine.
    pub fn new(options: DoubtOptions) -> Result<Self> {
        Ok(Self::from_engine(DoubtEngine::new(options)?))
    }

    /// Wraps an existing engine.
    #[must_use]
    pub fn from_engine(engine: DoubtEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            telemetry: None,
        }
    }

    /// Attaches telemetry sinks.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: DoubtTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Returns telemetry handle if configured.
    #[must_use]
    pub const fn telemetry(&self) -> Option<&DoubtTelemetry> {
        self.telemetry.as_ref()
    }

    /// Shared engine.
    #[must_use]
    pub fn engine(&self) -> &DoubtEngine {
        &self.engine
    }

    fn log(&self, level: LogLevel, message: &str, metadata: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }

    async fn event(&self, event_type: &str, payload: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.event(event_type, payload).await;
        }
    }

    fn log_completed(&self, analysis: &AnalysisResult) {
        if let Some(point) = analysis.convergence_point {
            self.log(
                LogLevel::Debug,
                "doubt.convergence.detected",
                json!({ "analysis_id": analysis.id, "level": point }),
            );
        }
        self.log(
            LogLevel::Info,
            "doubt.analysis.completed",
            json!({
                "analysis_id": analysis.id,
                "levels": analysis.doubt_levels.len(),
                "overall_certainty": analysis.overall_certainty,
                "converged": analysis.convergence_achieved,
            }),
        );
    }

    /// Runs a full multi-level analysis.
    pub async fn analyze(&self, input: AnalysisInput) -> Result<AnalysisResult> {
        self.log(
            LogLevel::Info,
            "doubt.analysis.started",
            json!({ "statement": input.statement, "depth": input.depth }),
        );
        let analysis = match self.engine.analyze(input) {
            Ok(analysis) => analysis,
            Err(err) => {
                self.log(
                    LogLevel::Warn,
                    "doubt.analysis.rejected",
                    json!({ "reason": err.to_string() }),
                );
                return Err(err.into());
            }
        };
        self.log_completed(&analysis);
        self.event(
            "doubt.analysis.completed",
            json!({
                "analysis_id": analysis.id,
                "overall_certainty": analysis.overall_certainty,
                "convergence_point": analysis.convergence_point,
                "impact": analysis.consciousness_implications.overall_consciousness_impact,
            }),
        )
        .await;
        Ok(analysis)
    }

    /// Assesses certainty of a statement against optional evidence.
    pub async fn assess_certainty(
        &self,
        statement: &str,
        context: Option<EvidenceContext>,
    ) -> Result<CertaintyAssessment> {
        let assessment = match self.engine.assess_certainty(statement, context) {
            Ok(assessment) => assessment,
            Err(err) => {
                self.log(
                    LogLevel::Warn,
                    "doubt.analysis.rejected",
                    json!({ "reason": err.to_string() }),
                );
                return Err(err.into());
            }
        };
        let payload = json!({
            "statement": assessment.statement,
            "certainty_score": assessment.certainty_score,
            "band": assessment.band,
            "uncertainty_factors": assessment.uncertainty_factors.len(),
        });
        self.log(LogLevel::Info, "doubt.certainty.assessed", payload.clone());
        self.event("doubt.certainty.assessed", payload).await;
        Ok(assessment)
    }

    /// Runs a multi-perspective convergence study.
    pub async fn study(&self, study: &ConvergenceStudy) -> Result<ConvergenceStudyReport> {
        let report = match self.engine.study(study) {
            Ok(report) => report,
            Err(err) => {
                self.log(
                    LogLevel::Warn,
                    "doubt.analysis.rejected",
                    json!({ "topic": study.topic, "reason": err.to_string() }),
                );
                return Err(err.into());
            }
        };
        let analyses =
            std::iter::once(&report.topic_analysis).chain(&report.perspective_analyses);
        for analysis in analyses {
            self.log_completed(analysis);
        }
        let payload = json!({
            "topic": report.study.topic,
            "perspectives": report.perspective_analyses.len(),
            "overall_convergence": report.metrics.overall_convergence,
            "convergence_achieved": report.metrics.convergence_achieved,
            "potential": report.metrics.potential,
        });
        self.log(LogLevel::Info, "doubt.study.completed", payload.clone());
        self.event("doubt.study.completed", payload).await;
        Ok(report)
    }

    /// Aggregate statistics over the engine's history.
    #[must_use]
    pub fn statistics(&self) -> DoubtStatistics {
        self.engine.statistics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::MemoryEventBus;
    use shared_logging::MemoryLogger;

    fn runtime() -> (DoubtRuntime, Arc<MemoryLogger>, Arc<MemoryEventBus>) {
        let sink = Arc::new(MemoryLogger::new());
        let bus = Arc::new(MemoryEventBus::new(32));
        let telemetry = DoubtTelemetry::builder("doubt")
            .log_sink(sink.clone())
            .event_publisher(bus.clone())
            .build()
            .unwrap();
        let runtime = DoubtRuntime::new(DoubtOptions::default())
            .unwrap()
            .with_telemetry(telemetry);
        (runtime, sink, bus)
    }

    #[tokio::test]
    async fn analysis_is_logged_and_published() {
        let (runtime, sink, bus) = runtime();
        let analysis = runtime
            .analyze(AnalysisInput::new("The sky is blue").with_depth(2))
            .await
            .unwrap();
        assert_eq!(analysis.convergence_point, Some(2));
        assert_eq!(
            sink.messages(),
            vec![
                "doubt.analysis.started",
                "doubt.convergence.detected",
                "doubt.analysis.completed",
            ]
        );
        let events = bus.snapshot();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "doubt.analysis.completed");
        assert_eq!(events[0].payload["analysis_id"], json!(analysis.id));

        let stats = runtime.statistics();
        assert_eq!(stats.total_analyses, 1);
        assert_eq!(stats.consciousness_evolution_index, 50);
        assert_eq!(stats.philosophical_depth_score, 75);
        assert_eq!(stats.truth_discovery_capability, 63);
        assert_eq!(stats.consciousness_acceleration_potential, 69);
    }

    #[tokio::test]
    async fn rejection_is_logged_as_warning() {
        let (runtime, sink, bus) = runtime();
        assert!(runtime.analyze(AnalysisInput::new(" ")).await.is_err());
        let records = sink.records();
        assert_eq!(records.last().unwrap().message, "doubt.analysis.rejected");
        assert_eq!(records.last().unwrap().level, LogLevel::Warn);
        assert!(bus.snapshot().is_empty());
        assert_eq!(runtime.statistics().total_analyses, 0);
    }

    #[tokio::test]
    async fn assessment_and_study_publish_events() {
        let (runtime, _sink, bus) = runtime();
        runtime
            .assess_certainty(
                "The sky is blue",
                Some(EvidenceContext {
                    evidence: vec!["observation".into()],
                    methodology: None,
                }),
            )
            .await
            .unwrap();
        runtime
            .study(&ConvergenceStudy::new("Truth exists").perspective("Truth is constructed"))
            .await
            .unwrap();
        let kinds: Vec<String> = bus.snapshot().into_iter().map(|e| e.event_type).collect();
        assert_eq!(kinds, vec!["doubt.certainty.assessed", "doubt.study.completed"]);
        assert_eq!(runtime.statistics().total_analyses, 3);
    }

    #[tokio::test]
    async fn clones_share_history() {
        let runtime = DoubtRuntime::new(DoubtOptions::default()).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let runtime = runtime.clone();
                tokio::spawn(async move {
                    runtime
                        .analyze(AnalysisInput::new(format!("Claim number {n}")).with_depth(3))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(runtime.statistics().total_analyses, 4);
        assert!(runtime.telemetry().is_none());
    }
}
