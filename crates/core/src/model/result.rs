use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Minimum score (percent) that counts as a pass, for both the checkpoint
/// quiz and the reassessment.
pub const PASS_THRESHOLD: f64 = 70.0;

/// Diagnostic outcome of the checkpoint quiz.
///
/// `score` is the wire name used by the evaluation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    #[serde(rename = "score")]
    pub score_percent: f64,
    pub passed: bool,
    pub weak_concepts: BTreeSet<String>,
}

impl QuizResult {
    /// Build a result from a raw score, deriving the pass verdict.
    #[must_use]
    pub fn from_score(score_percent: f64, weak_concepts: BTreeSet<String>) -> Self {
        Self {
            score_percent,
            passed: score_percent >= PASS_THRESHOLD,
            weak_concepts,
        }
    }
}

/// Verdict of the reassessment, computed client-side.
///
/// Not persisted anywhere by this core; the upstream service has no endpoint
/// for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    #[serde(rename = "score")]
    pub score_percent: f64,
    pub passed: bool,
}

impl FinalResult {
    #[must_use]
    pub fn from_score(score_percent: f64) -> Self {
        Self {
            score_percent,
            passed: score_percent >= PASS_THRESHOLD,
        }
    }
}

/// Remedial explanations keyed by concept, produced for a failed checkpoint.
pub type FeynmanExplanationSet = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_verdict_uses_threshold_inclusively() {
        assert!(QuizResult::from_score(70.0, BTreeSet::new()).passed);
        assert!(!QuizResult::from_score(69.99, BTreeSet::new()).passed);
        assert!(FinalResult::from_score(100.0).passed);
        assert!(!FinalResult::from_score(0.0).passed);
    }

    #[test]
    fn quiz_result_matches_evaluation_wire_shape() {
        let json = r#"{"score":50.0,"passed":false,"weak_concepts":["Deadlocks"]}"#;
        let result: QuizResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.score_percent, 50.0);
        assert!(!result.passed);
        assert!(result.weak_concepts.contains("Deadlocks"));
    }
}
