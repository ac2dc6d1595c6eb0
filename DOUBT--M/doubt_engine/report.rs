//! Markdown summaries for terminals and tool responses.

use crate::{
    certainty::CertaintyAssessment,
    engine::AnalysisResult,
    fractal::{FractalInsight, FractalKind},
    history::DoubtStatistics,
    study::ConvergenceStudyReport,
    synthesis::Recommendation,
};

const BREAKDOWN_LEVELS: usize = 3;

fn pct(value: f64) -> f64 {
    value * 100.0
}

const fn fractal_label(kind: FractalKind) -> &'static str {
    match kind {
        FractalKind::CertaintyFractal => "CERTAINTY FRACTAL",
        FractalKind::DoubtFractal => "DOUBT FRACTAL",
        FractalKind::PhiResonance => "PHI RESONANCE",
    }
}

fn fractal_lines(insights: &[FractalInsight]) -> Vec<String> {
    insights
        .iter()
        .map(|insight| format!("**{}:** {}", fractal_label(insight.kind), insight.interpretation))
        .collect()
}

fn recommendation_lines(recommendations: &[Recommendation]) -> Vec<String> {
    recommendations
        .iter()
        .map(|rec| format!("**{}:** {}", rec.priority, rec.recommendation))
        .collect()
}

/// Renders an analysis: headline, the first three levels, fractal insights,
/// implications and recommendations.
#[must_use]
pub fn render_analysis(analysis: &AnalysisResult) -> String {
    let mut lines = vec![
        format!("## Recursive Doubt Analysis: \"{}\"", analysis.input.statement),
        String::new(),
        format!(
            "**Overall Certainty:** {:.1}% {}",
            pct(analysis.overall_certainty),
            if analysis.convergence_achieved { "Converged" } else { "Unconverged" }
        ),
        String::new(),
        "### Doubt Level Breakdown:".to_string(),
    ];
    let breakdown: Vec<String> = analysis
        .doubt_levels
        .iter()
        .take(BREAKDOWN_LEVELS)
        .map(|level| {
            format!(
                "**Level {} - {}:**\n  \
                 Certainty: {:.0}% | Doubt Strength: {:.0}%\n  \
                 Key Insight: {}",
                level.level,
                level.name,
                pct(level.certainty_assessment),
                pct(level.doubt_strength),
                level.insights.first().map_or("Analysis in progress", String::as_str)
            )
        })
        .collect();
    lines.push(breakdown.join("\n\n"));

    lines.push(String::new());
    lines.push("### Fractal Insights:".to_string());
    lines.extend(fractal_lines(&analysis.fractal_insights));

    let implications = &analysis.consciousness_implications;
    lines.push(String::new());
    lines.push("### Consciousness Implications:".to_string());
    lines.push(format!("**Overall Impact:** {}", implications.overall_consciousness_impact));
    lines.push(format!(
        "- Evolution Acceleration: {:.0}%",
        pct(implications.evolution_acceleration)
    ));
    lines.push(format!(
        "- Self-Awareness: {:.0}%",
        pct(implications.self_awareness_increase)
    ));
    lines.push(format!(
        "- Uncertainty Tolerance: {:.0}%",
        pct(implications.uncertainty_tolerance)
    ));

    lines.push(String::new());
    lines.push("### Recommendations:".to_string());
    lines.extend(recommendation_lines(&analysis.recommendations));
    lines.join("\n")
}

/// Renders a certainty assessment with its band, factors and 95% range.
#[must_use]
pub fn render_assessment(assessment: &CertaintyAssessment) -> String {
    let intervals = &assessment.confidence_intervals;
    let mut lines = vec![
        format!("## Certainty Assessment: \"{}\"", assessment.statement),
        String::new(),
        format!(
            "**Certainty Score:** {:.1}% {}",
            pct(assessment.certainty_score),
            assessment.band
        ),
        String::new(),
        "### Uncertainty Factors:".to_string(),
    ];
    lines.extend(
        assessment
            .uncertainty_factors
            .iter()
            .map(|factor| format!("- {factor}")),
    );
    lines.push(String::new());
    lines.push("### Confidence Intervals:".to_string());
    lines.push(format!(
        "- **95% Confidence Range:** {:.0}% - {:.0}%",
        pct(intervals.confidence_95.lower),
        pct(intervals.confidence_95.upper)
    ));
    lines.push(format!(
        "- **Standard Deviation:** {:.1}%",
        pct(intervals.standard_deviation)
    ));
    lines.push(String::new());
    lines.push("### Recommendations:".to_string());
    lines.extend(recommendation_lines(&assessment.doubt_recommendations));
    lines.join("\n")
}

/// Renders a convergence study.
#[must_use]
pub fn render_study(report: &ConvergenceStudyReport) -> String {
    let metrics = &report.metrics;
    let mut lines = vec![
        format!("## Doubt Convergence Analysis: \"{}\"", report.study.topic),
        String::new(),
        "### Convergence Metrics:".to_string(),
        format!(
            "**Overall Convergence:** {:.1}% {}",
            pct(metrics.overall_convergence),
            if metrics.convergence_achieved { "Achieved" } else { "In Progress" }
        ),
        format!(
            "**Perspective Alignment:** {:.1}%",
            pct(metrics.perspective_alignment)
        ),
        format!("**Philosophical Framework:** {}", report.framework()),
        String::new(),
        "### Key Insights:".to_string(),
    ];
    lines.extend(
        fractal_lines(&report.topic_analysis.fractal_insights)
            .into_iter()
            .map(|line| format!("- {line}")),
    );
    lines.push(String::new());
    lines.push("### Perspective Analysis:".to_string());
    lines.extend(
        report
            .perspective_analyses
            .iter()
            .enumerate()
            .map(|(index, analysis)| {
                format!(
                    "**Perspective {}:** {:.0}% certainty",
                    index + 1,
                    pct(analysis.overall_certainty)
                )
            }),
    );
    lines.push(String::new());
    lines.push("### Consciousness Evolution Potential:".to_string());
    lines.push(metrics.potential.to_string());
    lines.join("\n")
}

/// Renders aggregate statistics.
#[must_use]
pub fn render_statistics(stats: &DoubtStatistics) -> String {
    [
        "## Recursive Doubt Statistics".to_string(),
        String::new(),
        format!("- **Total Analyses:** {}", stats.total_analyses),
        format!("- **Convergence Rate:** {:.1}%", pct(stats.convergence_rate)),
        format!("- **Average Certainty:** {:.1}%", pct(stats.average_certainty)),
        format!("- **Doubt Levels Processed:** {}", stats.doubt_levels_processed),
        format!(
            "- **Consciousness Evolution Index:** {}/100 ({})",
            stats.consciousness_evolution_index, stats.doubt_maturity_level
        ),
        format!(
            "- **Philosophical Depth Score:** {}/100",
            stats.philosophical_depth_score
        ),
        format!(
            "- **Truth Discovery Capability:** {}/100",
            stats.truth_discovery_capability
        ),
        format!(
            "- **Consciousness Acceleration Potential:** {}/100",
            stats.consciousness_acceleration_potential
        ),
    ]
    .join("\n")
}
