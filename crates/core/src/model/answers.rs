use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The learner's checkpoint answers, keyed by question id.
///
/// At most one answer per question; a later submission for the same id
/// overwrites the earlier one. Serializes as a plain JSON object, which is
/// the `user_answers` body of the evaluation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<String, String>);

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the selected option for a question, replacing any prior pick.
    pub fn record(&mut self, question_id: impl Into<String>, option: impl Into<String>) {
        self.0.insert(question_id.into(), option.into());
    }

    #[must_use]
    pub fn selected(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// The learner's reassessment answers, keyed by question ordinal (0-based).
///
/// Reassessment questions carry no stable id, so position stands in for one.
/// Same overwrite semantics as [`AnswerMap`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReassessmentAnswerMap(BTreeMap<usize, String>);

impl ReassessmentAnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, ordinal: usize, option: impl Into<String>) {
        self.0.insert(ordinal, option.into());
    }

    #[must_use]
    pub fn selected(&self, ordinal: usize) -> Option<&str> {
        self.0.get(&ordinal).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_answer_overwrites_earlier_one() {
        let mut answers = AnswerMap::new();
        answers.record("q1", "Paris");
        answers.record("q1", "Lyon");

        assert_eq!(answers.len(), 1);
        assert_eq!(answers.selected("q1"), Some("Lyon"));
    }

    #[test]
    fn reassessment_answers_overwrite_by_ordinal() {
        let mut answers = ReassessmentAnswerMap::new();
        answers.record(0, "a");
        answers.record(0, "b");
        answers.record(2, "c");

        assert_eq!(answers.len(), 2);
        assert_eq!(answers.selected(0), Some("b"));
        assert_eq!(answers.selected(1), None);
    }

    #[test]
    fn answer_map_serializes_as_object() {
        let mut answers = AnswerMap::new();
        answers.record("q1", "Paris");
        let json = serde_json::to_string(&answers).unwrap();
        assert_eq!(json, r#"{"q1":"Paris"}"#);
    }
}
