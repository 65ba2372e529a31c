//! Answer normalization and matching
//!
//! Answers are compared after stripping the punctuation and spacing that
//! learners type inconsistently, so `あい・て`, `あいて` and `あい て` are
//! all the same answer.

/// Separates alternative accepted answers inside one answer field.
pub const ANSWER_SEPARATOR: char = '/';

/// Reduce an answer to the form used for comparison
///
/// Removes:
/// - interpuncts: ・ (U+30FB), ･ (U+FF65), · (U+00B7)
/// - ASCII periods
/// - wave dashes: ~ and ～ (U+FF5E)
/// - all whitespace, including the full-width space (U+3000)
///
/// No case folding is performed.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{30FB}' | '\u{FF65}' | '\u{00B7}' | '.' | '~' | '\u{FF5E}'))
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Normalize a raw JSON value, coercing non-strings to their text form first.
pub fn normalize_value(value: &serde_json::Value) -> String {
    normalize(&value_to_text(value))
}

/// The display text of a JSON value: strings as-is, `null` as empty, anything else as JSON.
pub fn value_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Split an answer field into its accepted alternatives, in order.
pub fn answer_candidates(raw_answer: &str) -> Vec<&str> {
    raw_answer
        .split(ANSWER_SEPARATOR)
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .collect()
}

/// Check a submission against an answer field that may list several alternatives
///
/// Returns the canonical answer (the first alternative) when the submission
/// matches any of them after normalization.
pub fn matches_answer(submission: &str, raw_answer: &str) -> Option<String> {
    let submitted = normalize(submission);
    let candidates = answer_candidates(raw_answer);
    let canonical = candidates.first()?.to_string();

    candidates
        .iter()
        .any(|candidate| normalize(candidate) == submitted)
        .then_some(canonical)
}

/// The answer to show once a card is revealed.
pub fn canonical_answer(raw_answer: &str) -> String {
    answer_candidates(raw_answer)
        .first()
        .map(|candidate| candidate.to_string())
        .unwrap_or_else(|| raw_answer.trim().to_string())
}
