use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::TopicCode;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised while assembling lesson content.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("duplicate question id in content set: {0}")]
    DuplicateQuestionId(String),
}

//
// ─── ANSWER KEY ───────────────────────────────────────────────────────────────
//

/// The correct answer to a question, as emitted by upstream question sources.
///
/// Sources emit either the literal option string or a 1-based position into
/// the option list. Both forms are kept as-is and resolved to the canonical
/// option string only at comparison time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    /// 1-based index into the question's option sequence.
    Index(u32),
    /// The canonical correct option string itself.
    Literal(String),
}

impl AnswerKey {
    /// Resolves the key to the canonical correct option.
    ///
    /// Returns `None` when a numeric key falls outside the option sequence;
    /// callers treat that as "never matches" rather than an error.
    #[must_use]
    pub fn resolve<'a>(&'a self, options: &'a [String]) -> Option<&'a str> {
        match self {
            AnswerKey::Index(k) => {
                let idx = usize::try_from(k.checked_sub(1)?).ok()?;
                options.get(idx).map(String::as_str)
            }
            AnswerKey::Literal(s) => Some(s.as_str()),
        }
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A multiple-choice question within a content set.
///
/// Field names follow the upstream content service schema: `q` for the
/// question text, `opts` for the options, `a` for the answer key.
/// Reassessment payloads omit `id`; those questions are addressed by ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "q")]
    pub text: String,
    #[serde(rename = "opts")]
    pub options: Vec<String>,
    #[serde(rename = "a")]
    pub answer_key: AnswerKey,
    /// Concept tag used for weak-concept tracking, when the source carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
}

impl Question {
    /// The canonical correct option string, if the key resolves.
    #[must_use]
    pub fn canonical_option(&self) -> Option<&str> {
        self.answer_key.resolve(&self.options)
    }

    /// Key under which this question's concept is tracked.
    ///
    /// Falls back to the question text when no concept tag is present.
    #[must_use]
    pub fn concept_key(&self) -> &str {
        self.concept.as_deref().unwrap_or(&self.text)
    }
}

//
// ─── LESSON CONTENT ───────────────────────────────────────────────────────────
//

/// Teaching material for a topic: explanatory context plus the checkpoint
/// question set. Created when a topic is selected, discarded on reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonContent {
    topic: TopicCode,
    context: String,
    questions: Vec<Question>,
}

impl LessonContent {
    /// Assemble content for a topic.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::DuplicateQuestionId` if two questions share an id.
    pub fn new(
        topic: TopicCode,
        context: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, ContentError> {
        let mut seen = std::collections::BTreeSet::new();
        for question in &questions {
            if !seen.insert(question.id.as_str()) {
                return Err(ContentError::DuplicateQuestionId(question.id.clone()));
            }
        }

        Ok(Self {
            topic,
            context: context.into(),
            questions,
        })
    }

    #[must_use]
    pub fn topic(&self) -> &TopicCode {
        &self.topic
    }

    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Question texts, in order. This is the exclusion list handed to the
    /// reassessment generator so it cannot repeat a checkpoint question.
    #[must_use]
    pub fn question_texts(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.text.clone()).collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
