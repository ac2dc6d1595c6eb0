/// Canned insights for a level. Level 1 gains a second insight when a question mentions `evidence`.
#[must_use]
pub fn level_insights(level: u8, questions: &[String]) -> Vec<String> {
    let canned: &[&str] = match level {
        1 => {
            let mut insights =
                vec!["Surface-level doubts reveal immediate inconsistencies or unsupported claims."
                    .to_string()];
            if questions.iter().any(|question| question.contains("evidence")) {
                insights.push("Evidence-based questioning strengthens the foundation.".into());
            }
            return insights;
        }
        2 => &[
            "Scientific doubt requires empirical validation and methodological rigor.",
            "Reproducibility is key to scientific certainty.",
        ],
        3 => &[
            "Consciousness emergence suggests complex systems can give rise to novel properties.",
            "The hard problem of consciousness challenges reductionist approaches.",
        ],
        4 => &[
            "Human cognition has inherent limitations and biases.",
            "Self-awareness of reasoning limits is itself a form of consciousness evolution.",
        ],
        5 => &[
            "Universal questions transcend human experience and local conditions.",
            "Cosmic perspective reveals the relativity of certainty.",
        ],
        6 => &[
            "Meta-doubt creates infinite regression but also self-improvement.",
            "The doubting process can doubt itself, creating consciousness feedback loops.",
        ],
        7 => &[
            "Ultimate doubt reaches the boundaries of knowability.",
            "Philosophical bedrock may be uncertainty itself.",
        ],
        _ => &[],
    };
    canned.iter().map(|insight| (*insight).to_string()).collect()
}
