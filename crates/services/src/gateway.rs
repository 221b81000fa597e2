use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use vihar_core::model::{
    AnswerMap, FeynmanExplanationSet, LessonContent, Question, QuizResult, TopicCatalog, TopicCode,
};
use vihar_core::score::score_quiz;

use crate::error::GatewayError;

/// Contract with the remote content/evaluation service.
///
/// Pure request/response; implementations retain no session state. The
/// session state machine is the only caller and owns all sequencing.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Fetch the topic catalog (code -> display name).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the catalog cannot be retrieved.
    async fn fetch_topics(&self) -> Result<TopicCatalog, GatewayError>;

    /// Fetch the lesson content for a topic.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` for an unknown topic, or other
    /// gateway errors.
    async fn fetch_content(&self, topic: &TopicCode) -> Result<LessonContent, GatewayError>;

    /// Have the service score a checkpoint quiz.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Unauthorized` when the token is rejected, or
    /// other gateway errors.
    async fn evaluate_quiz(
        &self,
        topic: &TopicCode,
        answers: &AnswerMap,
        auth_token: &str,
    ) -> Result<QuizResult, GatewayError>;

    /// Fetch remedial explanations for the given weak concepts.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the explanations cannot be retrieved.
    async fn fetch_feynman_explanations(
        &self,
        topic: &TopicCode,
        concepts: &[String],
    ) -> Result<FeynmanExplanationSet, GatewayError>;

    /// Fetch reassessment questions, excluding the given question texts so
    /// the learner never sees a checkpoint question twice.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if questions cannot be generated.
    async fn fetch_reassessment(
        &self,
        topic: &TopicCode,
        excluded_texts: &[String],
    ) -> Result<Vec<Question>, GatewayError>;
}

/// Seed data for one topic in the in-memory gateway.
#[derive(Debug, Clone, Default)]
pub struct TopicFixture {
    pub display_name: String,
    pub context: String,
    pub questions: Vec<Question>,
    pub explanations: FeynmanExplanationSet,
    /// Pool the reassessment draws from; the exclusion list is applied to it.
    pub reassessment_pool: Vec<Question>,
}

/// In-memory gateway implementation for testing and prototyping.
///
/// Checkpoint quizzes are scored locally with the same algorithm the
/// evaluation service applies. An empty auth token is rejected the way the
/// remote service rejects a missing credential.
#[derive(Clone, Default)]
pub struct InMemoryContentGateway {
    topics: Arc<Mutex<BTreeMap<TopicCode, TopicFixture>>>,
}

impl InMemoryContentGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace the fixture for a topic.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned; fixtures are only mutated
    /// during test setup.
    pub fn insert_topic(&self, code: TopicCode, fixture: TopicFixture) {
        self.topics
            .lock()
            .expect("fixture lock poisoned")
            .insert(code, fixture);
    }

    fn with_topic<T>(
        &self,
        code: &TopicCode,
        f: impl FnOnce(&TopicFixture) -> T,
    ) -> Result<T, GatewayError> {
        let guard = self.topics.lock().expect("fixture lock poisoned");
        guard.get(code).map(f).ok_or(GatewayError::NotFound)
    }
}

#[async_trait]
impl ContentGateway for InMemoryContentGateway {
    async fn fetch_topics(&self) -> Result<TopicCatalog, GatewayError> {
        let guard = self.topics.lock().expect("fixture lock poisoned");
        Ok(guard
            .iter()
            .map(|(code, fixture)| (code.clone(), fixture.display_name.clone()))
            .collect())
    }

    async fn fetch_content(&self, topic: &TopicCode) -> Result<LessonContent, GatewayError> {
        let (context, questions) =
            self.with_topic(topic, |f| (f.context.clone(), f.questions.clone()))?;
        // Fixtures are seeded with unique ids, so this cannot fail in practice.
        LessonContent::new(topic.clone(), context, questions)
            .map_err(|_| GatewayError::NotFound)
    }

    async fn evaluate_quiz(
        &self,
        topic: &TopicCode,
        answers: &AnswerMap,
        auth_token: &str,
    ) -> Result<QuizResult, GatewayError> {
        if auth_token.trim().is_empty() {
            return Err(GatewayError::Unauthorized);
        }
        self.with_topic(topic, |f| score_quiz(&f.questions, answers))
    }

    async fn fetch_feynman_explanations(
        &self,
        topic: &TopicCode,
        concepts: &[String],
    ) -> Result<FeynmanExplanationSet, GatewayError> {
        self.with_topic(topic, |f| {
            f.explanations
                .iter()
                .filter(|(concept, _)| concepts.contains(concept))
                .map(|(concept, text)| (concept.clone(), text.clone()))
                .collect()
        })
    }

    async fn fetch_reassessment(
        &self,
        topic: &TopicCode,
        excluded_texts: &[String],
    ) -> Result<Vec<Question>, GatewayError> {
        self.with_topic(topic, |f| {
            f.reassessment_pool
                .iter()
                .filter(|q| !excluded_texts.contains(&q.text))
                .cloned()
                .collect()
        })
    }
}
