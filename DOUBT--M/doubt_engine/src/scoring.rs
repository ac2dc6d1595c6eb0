/// Cues that make a question more challenging; each adds 0.1.
pub const CHALLENGE_INDICATORS: [&str; 11] = [
    "how",
    "why",
    "what if",
    "really",
    "truly",
    "actually",
    "certain",
    "know",
    "prove",
    "evidence",
    "contradict",
];

/// Vocabulary that raises statement complexity; each match adds 0.15.
pub const PHILOSOPHICAL_TERMS: [&str; 6] = [
    "consciousness",
    "reality",
    "truth",
    "existence",
    "universe",
    "mind",
];

const BASE_CHALLENGE: f64 = 0.3;
const BASE_COMPLEXITY: f64 = 0.2;

/// Rhetorical weight of a single question in `[0.3, 1.0]`.
#[must_use]
pub fn assess_question_challenge(question: &str) -> f64 {
    let lowered = question.to_lowercase();
    let score = CHALLENGE_INDICATORS
        .iter()
        .filter(|indicator| lowered.contains(*indicator))
        .fold(BASE_CHALLENGE, |acc, _| acc + 0.1);
    score.min(1.0)
}

/// Lexical complexity of the statement in `[0.2, 0.9]`.
///
/// Length is counted in UTF-16 code units.
#[must_use]
pub fn assess_input_complexity(statement: &str) -> f64 {
    let lowered = statement.to_lowercase();
    let length = statement.encode_utf16().count() as f64;
    let question_marks = statement.matches('?').count() as f64;
    let terms = PHILOSOPHICAL_TERMS
        .iter()
        .filter(|term| lowered.contains(*term))
        .count() as f64;

    let mut complexity = BASE_COMPLEXITY;
    complexity += (length / 1000.0).min(0.2);
    complexity += (question_marks * 0.1).min(0.2);
    complexity += (terms * 0.15).min(0.3);
    complexity.min(1.0)
}

/// Combines per-question challenge with statement complexity into a 0-1 doubt strength.
#[must_use]
pub fn assess_doubt_strength(questions: &[String], statement: &str) -> f64 {
    if questions.is_empty() {
        return 0.0;
    }
    let mut total: f64 = questions
        .iter()
        .map(|question| assess_question_challenge(question))
        .sum();
    total *= 1.0 + assess_input_complexity(statement) * 0.5;
    (total / questions.len() as f64).min(1.0)
}
