//! Aggregate scoring for the checkpoint quiz and the reassessment.

use std::collections::BTreeSet;

use crate::evaluate::is_correct;
use crate::model::{AnswerMap, FinalResult, Question, QuizResult, ReassessmentAnswerMap};

/// Score a checkpoint quiz.
///
/// Questions with no recorded answer count as incorrect; submitting an
/// incomplete quiz is allowed and scores silently. Each missed question
/// contributes its concept key to `weak_concepts` (deduplicated). An empty
/// question set scores 0 rather than dividing by zero.
#[must_use]
pub fn score_quiz(questions: &[Question], answers: &AnswerMap) -> QuizResult {
    let mut correct = 0_usize;
    let mut weak_concepts = BTreeSet::new();

    for question in questions {
        if is_correct(question, answers.selected(&question.id)) {
            correct += 1;
        } else {
            weak_concepts.insert(question.concept_key().to_string());
        }
    }

    QuizResult::from_score(percentage(correct, questions.len()), weak_concepts)
}

/// Score a reassessment, answers keyed by question ordinal.
///
/// Same evaluator and threshold as the checkpoint quiz; missing answers are
/// incorrect, never an error.
#[must_use]
pub fn score_reassessment(
    questions: &[Question],
    answers: &ReassessmentAnswerMap,
) -> FinalResult {
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(ordinal, question)| is_correct(question, answers.selected(*ordinal)))
        .count();

    FinalResult::from_score(percentage(correct, questions.len()))
}

fn percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * correct as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerKey;

    fn capital_question() -> Question {
        Question {
            id: "q1".to_string(),
            text: "Capital of France?".to_string(),
            options: vec!["Paris".to_string(), "Lyon".to_string()],
            answer_key: AnswerKey::Literal("Paris".to_string()),
            concept: None,
        }
    }

    fn indexed_question() -> Question {
        Question {
            id: "q2".to_string(),
            text: "Pick the second option".to_string(),
            options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            answer_key: AnswerKey::Index(2),
            concept: Some("Indexing".to_string()),
        }
    }

    #[test]
    fn empty_question_set_scores_zero_without_dividing() {
        let result = score_quiz(&[], &AnswerMap::new());
        assert_eq!(result.score_percent, 0.0);
        assert!(!result.passed);
        assert!(result.weak_concepts.is_empty());
    }

    #[test]
    fn half_right_fails_with_one_weak_concept() {
        let mut answers = AnswerMap::new();
        answers.record("q1", "Paris");
        answers.record("q2", "a");

        let result = score_quiz(&[capital_question(), indexed_question()], &answers);

        assert_eq!(result.score_percent, 50.0);
        assert!(!result.passed);
        assert_eq!(result.weak_concepts.len(), 1);
        assert!(result.weak_concepts.contains("Indexing"));
    }

    #[test]
    fn all_right_passes_with_no_weak_concepts() {
        let mut answers = AnswerMap::new();
        answers.record("q1", "Paris");
        answers.record("q2", "b");

        let result = score_quiz(&[capital_question(), indexed_question()], &answers);

        assert_eq!(result.score_percent, 100.0);
        assert!(result.passed);
        assert!(result.weak_concepts.is_empty());
    }

    #[test]
    fn unanswered_questions_score_as_incorrect() {
        let result = score_quiz(
            &[capital_question(), indexed_question()],
            &AnswerMap::new(),
        );
        assert_eq!(result.score_percent, 0.0);
        assert_eq!(result.weak_concepts.len(), 2);
    }

    #[test]
    fn weak_concept_falls_back_to_question_text() {
        let result = score_quiz(&[capital_question()], &AnswerMap::new());
        assert!(result.weak_concepts.contains("Capital of France?"));
    }

    #[test]
    fn duplicate_weak_concepts_are_deduplicated() {
        let mut second = capital_question();
        second.id = "q9".to_string();
        second.concept = Some("Geography".to_string());
        let mut first = capital_question();
        first.concept = Some("Geography".to_string());

        let result = score_quiz(&[first, second], &AnswerMap::new());
        assert_eq!(result.weak_concepts.len(), 1);
    }

    #[test]
    fn two_of_three_reassessment_answers_falls_short_of_threshold() {
        let questions = vec![
            capital_question(),
            indexed_question(),
            Question {
                id: String::new(),
                text: "2 + 2?".to_string(),
                options: vec!["3".to_string(), "4".to_string()],
                answer_key: AnswerKey::Index(2),
                concept: None,
            },
        ];
        let mut answers = ReassessmentAnswerMap::new();
        answers.record(0, "Paris");
        answers.record(1, "b");
        answers.record(2, "3");

        let result = score_reassessment(&questions, &answers);

        assert!((result.score_percent - 200.0 / 3.0).abs() < 1e-9);
        assert!(!result.passed);
    }

    #[test]
    fn skipped_reassessment_answers_count_against_the_score() {
        let questions = vec![capital_question(), indexed_question()];
        let mut answers = ReassessmentAnswerMap::new();
        answers.record(0, "Paris");

        let result = score_reassessment(&questions, &answers);
        assert_eq!(result.score_percent, 50.0);
    }
}
