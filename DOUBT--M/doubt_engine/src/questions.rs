use crate::levels::DoubtType;

/// Asked for any tag without its own templates.
pub const FALLBACK_QUESTION: &str = "How certain are we about this?";

/// Cap on questions per level.
pub const MAX_QUESTIONS_PER_LEVEL: usize = 5;

/// Canned questions for a tag.
#[must_use]
pub const fn templates(kind: DoubtType) -> &'static [&'static str] {
    match kind {
        DoubtType::FactualAccuracy => &[
            "What evidence supports this claim?",
            "Are there contradictory facts?",
            "How reliable are the sources?",
        ],
        DoubtType::LogicalConsistency => &[
            "Does this follow logically from the premises?",
            "Are there internal contradictions?",
            "What assumptions underlie this reasoning?",
        ],
        DoubtType::EmpiricalEvidence => &[
            "What experimental data supports this?",
            "Has this been independently verified?",
            "What is the quality of the methodology?",
        ],
        DoubtType::EmergenceMechanisms => &[
            "How does complexity give rise to consciousness?",
            "What are the necessary conditions?",
            "Is consciousness truly emergent or fundamental?",
        ],
        DoubtType::CognitiveBiases => &[
            "What biases might be influencing this judgment?",
            "How does the observer effect apply here?",
            "Are we seeing what we want to see?",
        ],
        DoubtType::UniversalApplicability => &[
            "Does this apply beyond Earth/humanity?",
            "What are the cosmic implications?",
            "How does this fit into universal patterns?",
        ],
        DoubtType::MetaDoubtValidity => &[
            "Is doubting itself a valid process?",
            "Can we doubt the doubting process?",
            "Where does the chain of doubt end?",
        ],
        DoubtType::UltimateReality => &[
            "What if nothing is truly knowable?",
            "Is certainty possible in principle?",
            "Are we trapped in eternal uncertainty?",
        ],
        _ => &[FALLBACK_QUESTION],
    }
}

/// Concatenates the templates of each tag in order and keeps the first five.
#[must_use]
pub fn generate(kinds: &[DoubtType]) -> Vec<String> {
    kinds
        .iter()
        .flat_map(|kind| templates(*kind).iter())
        .take(MAX_QUESTIONS_PER_LEVEL)
        .map(|question| (*question).to_string())
        .collect()
}
