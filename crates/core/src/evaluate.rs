//! Answer correctness, defined once.
//!
//! Both the checkpoint scorer and the reassessment path go through
//! [`is_correct`] so the two pipelines cannot drift apart on what counts as
//! a right answer.

use crate::model::Question;

/// Whether the submitted option answers the question correctly.
///
/// The question's answer key is resolved to its canonical option string
/// (numeric keys are 1-based positions, literal keys stand for themselves)
/// and compared with exact string equality. A missing submission, or a key
/// that does not resolve, is simply incorrect.
#[must_use]
pub fn is_correct(question: &Question, submitted: Option<&str>) -> bool {
    match (question.canonical_option(), submitted) {
        (Some(expected), Some(actual)) => expected == actual,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerKey;

    fn question(answer_key: AnswerKey) -> Question {
        Question {
            id: "q1".to_string(),
            text: "Capital of France?".to_string(),
            options: vec!["Paris".to_string(), "Lyon".to_string(), "Nice".to_string()],
            answer_key,
            concept: None,
        }
    }

    #[test]
    fn literal_key_matches_exactly() {
        let q = question(AnswerKey::Literal("Paris".to_string()));
        assert!(is_correct(&q, Some("Paris")));
        assert!(!is_correct(&q, Some("Lyon")));
        assert!(!is_correct(&q, Some("paris")));
    }

    #[test]
    fn numeric_key_matches_one_based_position() {
        let q = question(AnswerKey::Index(2));
        assert!(is_correct(&q, Some("Lyon")));
        assert!(!is_correct(&q, Some("Paris")));
    }

    #[test]
    fn missing_submission_is_incorrect_not_an_error() {
        let q = question(AnswerKey::Index(1));
        assert!(!is_correct(&q, None));
    }

    #[test]
    fn unresolvable_key_never_matches() {
        let q = question(AnswerKey::Index(9));
        assert!(!is_correct(&q, Some("Paris")));
        assert!(!is_correct(&q, None));
    }
}
