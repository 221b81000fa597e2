use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use vihar_core::model::{
    AnswerMap, FeynmanExplanationSet, FinalResult, LessonContent, Question, QuizResult,
    ReassessmentAnswerMap, TopicCatalog, TopicCode,
};
use vihar_core::score::score_reassessment;

use crate::clock::Clock;
use crate::error::{GatewayError, SessionError};
use crate::gateway::ContentGateway;
use super::stage::{QuizProgress, Stage};

/// The learning-session state machine.
///
/// Owns the current stage, the active topic, accumulated answers, and every
/// stage payload, and orchestrates gateway calls between stages. Intents are
/// serialized through `&mut self`; a gateway failure aborts the pending
/// transition and leaves every other field untouched, with the error text
/// retrievable via [`last_error`](Self::last_error).
pub struct LearningSession {
    gateway: Arc<dyn ContentGateway>,
    clock: Clock,
    auth_token: Option<String>,

    // Responses issued before the current epoch are stale and discarded.
    epoch: u64,
    busy: bool,
    last_error: Option<String>,

    stage: Stage,
    topics: TopicCatalog,
    selected_topic: Option<TopicCode>,
    started_at: Option<DateTime<Utc>>,
    content: Option<LessonContent>,
    cursor: usize,
    answers: AnswerMap,
    quiz_result: Option<QuizResult>,
    explanations: Option<FeynmanExplanationSet>,
    reassessment_questions: Option<Vec<Question>>,
    reassessment_answers: ReassessmentAnswerMap,
    final_result: Option<FinalResult>,
}

impl LearningSession {
    #[must_use]
    pub fn new(gateway: Arc<dyn ContentGateway>) -> Self {
        Self {
            gateway,
            clock: Clock::default(),
            auth_token: None,
            epoch: 0,
            busy: false,
            last_error: None,
            stage: Stage::Home,
            topics: TopicCatalog::default(),
            selected_topic: None,
            started_at: None,
            content: None,
            cursor: 0,
            answers: AnswerMap::new(),
            quiz_result: None,
            explanations: None,
            reassessment_questions: None,
            reassessment_answers: ReassessmentAnswerMap::new(),
            final_result: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Install or replace the credential used for evaluation calls.
    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
    }

    //
    // ─── EXPOSURE TO THE PRESENTATION LAYER ────────────────────────────────
    //

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// True while a gateway request issued by this session is in flight.
    /// The presentation layer uses this to block duplicate submissions.
    #[must_use]
    pub fn busy(&self) -> bool {
        self.busy
    }

    /// Text of the most recent fetch failure, cleared by the next
    /// successful intent.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn topics(&self) -> &TopicCatalog {
        &self.topics
    }

    #[must_use]
    pub fn selected_topic(&self) -> Option<&TopicCode> {
        self.selected_topic.as_ref()
    }

    /// When the active topic was selected, per the session clock.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn content(&self) -> Option<&LessonContent> {
        self.content.as_ref()
    }

    /// The checkpoint question under the cursor.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.content.as_ref()?.questions().get(self.cursor)
    }

    #[must_use]
    pub fn quiz_progress(&self) -> QuizProgress {
        let total = self
            .content
            .as_ref()
            .map_or(0, |c| c.questions().len());
        QuizProgress {
            total,
            answered: self.answers.len(),
            current: self.cursor,
            on_last_question: self.cursor + 1 >= total,
        }
    }

    #[must_use]
    pub fn quiz_result(&self) -> Option<&QuizResult> {
        self.quiz_result.as_ref()
    }

    #[must_use]
    pub fn explanations(&self) -> Option<&FeynmanExplanationSet> {
        self.explanations.as_ref()
    }

    #[must_use]
    pub fn reassessment_questions(&self) -> Option<&[Question]> {
        self.reassessment_questions.as_deref()
    }

    #[must_use]
    pub fn final_result(&self) -> Option<FinalResult> {
        self.final_result
    }

    //
    // ─── INTENTS ───────────────────────────────────────────────────────────
    //

    /// Load the topic catalog. Valid only in `Home`; the catalog is loaded
    /// once and survives resets.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `Home`, `Busy` while a
    /// request is in flight, or the gateway error on a failed fetch.
    pub async fn load_topics(&mut self) -> Result<(), SessionError> {
        self.expect_stage(Stage::Home, "load_topics")?;
        let epoch = self.begin_fetch()?;

        let outcome = self.gateway.fetch_topics().await;
        let Some(topics) = self.settle_fetch(epoch, "topic catalog fetch", outcome)? else {
            return Ok(());
        };

        debug!(topics = topics.len(), "topic catalog loaded");
        self.topics = topics;
        Ok(())
    }

    /// Select a topic and fetch its lesson content; moves to `Teaching`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownTopic` for a code missing from the
    /// catalog, `InvalidState`/`Busy` guards, or the gateway error on a
    /// failed fetch (the session stays in `Home`).
    pub async fn select_topic(&mut self, code: TopicCode) -> Result<(), SessionError> {
        self.expect_stage(Stage::Home, "select_topic")?;
        if !self.topics.contains(&code) {
            return Err(SessionError::UnknownTopic(code.as_str().to_string()));
        }
        let epoch = self.begin_fetch()?;

        let outcome = self.gateway.fetch_content(&code).await;
        let Some(content) = self.settle_fetch(epoch, "content fetch", outcome)? else {
            return Ok(());
        };

        debug!(topic = %code, questions = content.questions().len(), "entering teaching");
        self.selected_topic = Some(code);
        self.started_at = Some(self.clock.now());
        self.content = Some(content);
        self.stage = Stage::Teaching;
        Ok(())
    }

    /// Begin the checkpoint quiz: clears answers, cursor to the first
    /// question, moves to `Quiz`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `Teaching`.
    pub fn start_quiz(&mut self) -> Result<(), SessionError> {
        self.expect_stage(Stage::Teaching, "start_quiz")?;
        self.answers.clear();
        self.cursor = 0;
        self.stage = Stage::Quiz;
        Ok(())
    }

    /// Record the learner's pick for a question, replacing any prior pick.
    ///
    /// Option membership is the presentation layer's contract; it is not
    /// re-checked here.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `Quiz`.
    pub fn record_answer(
        &mut self,
        question_id: impl Into<String>,
        option: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.expect_stage(Stage::Quiz, "record_answer")?;
        self.answers.record(question_id, option);
        Ok(())
    }

    /// Move the cursor to the next question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `Quiz` or when already
    /// on the last question.
    pub fn advance_question(&mut self) -> Result<(), SessionError> {
        self.expect_stage(Stage::Quiz, "advance_question")?;
        if self.quiz_progress().on_last_question {
            return Err(self.invalid("advance_question"));
        }
        self.cursor += 1;
        Ok(())
    }

    /// Submit the checkpoint quiz for evaluation; moves to `Report`.
    ///
    /// Only reachable from the last question. Unanswered questions are
    /// scored as incorrect by the evaluation service.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `Quiz` or before the
    /// last question, `GatewayError::Unauthorized` when no credential is
    /// installed, or the gateway error on a failed call.
    pub async fn submit_quiz(&mut self) -> Result<(), SessionError> {
        self.expect_stage(Stage::Quiz, "submit_quiz")?;
        if !self.quiz_progress().on_last_question {
            return Err(self.invalid("submit_quiz"));
        }
        let Some(topic) = self.selected_topic.clone() else {
            return Err(self.invalid("submit_quiz"));
        };
        let Some(token) = self.auth_token.clone() else {
            self.last_error = Some(GatewayError::Unauthorized.to_string());
            return Err(GatewayError::Unauthorized.into());
        };
        let epoch = self.begin_fetch()?;

        let outcome = self
            .gateway
            .evaluate_quiz(&topic, &self.answers, &token)
            .await;
        let Some(result) = self.settle_fetch(epoch, "quiz evaluation", outcome)? else {
            return Ok(());
        };

        debug!(
            topic = %topic,
            score = result.score_percent,
            passed = result.passed,
            "checkpoint quiz evaluated"
        );
        self.quiz_result = Some(result);
        self.stage = Stage::Report;
        Ok(())
    }

    /// Leave the diagnostic report.
    ///
    /// A passed checkpoint completes the module (equivalent to a reset). A
    /// failed one fetches remedial explanations for the weak concepts and
    /// moves to `Feynman`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `Report`, `Busy`, or the
    /// gateway error on a failed explanation fetch.
    pub async fn proceed_from_report(&mut self) -> Result<(), SessionError> {
        self.expect_stage(Stage::Report, "proceed_from_report")?;
        let Some(result) = self.quiz_result.clone() else {
            return Err(self.invalid("proceed_from_report"));
        };

        if result.passed {
            debug!("checkpoint passed; module complete");
            self.reset();
            return Ok(());
        }

        let Some(topic) = self.selected_topic.clone() else {
            return Err(self.invalid("proceed_from_report"));
        };
        let concepts: Vec<String> = result.weak_concepts.iter().cloned().collect();
        let epoch = self.begin_fetch()?;

        let outcome = self
            .gateway
            .fetch_feynman_explanations(&topic, &concepts)
            .await;
        let Some(explanations) = self.settle_fetch(epoch, "explanation fetch", outcome)? else {
            return Ok(());
        };

        debug!(concepts = explanations.len(), "entering feynman remediation");
        self.explanations = Some(explanations);
        self.stage = Stage::Feynman;
        Ok(())
    }

    /// Fetch reassessment questions, excluding every checkpoint question
    /// text; clears reassessment answers and moves to `Reassessment`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `Feynman`, `Busy`, or
    /// the gateway error on a failed fetch.
    pub async fn start_reassessment(&mut self) -> Result<(), SessionError> {
        self.expect_stage(Stage::Feynman, "start_reassessment")?;
        let (Some(topic), Some(content)) = (self.selected_topic.clone(), self.content.as_ref())
        else {
            return Err(self.invalid("start_reassessment"));
        };
        let excluded = content.question_texts();
        let epoch = self.begin_fetch()?;

        let outcome = self.gateway.fetch_reassessment(&topic, &excluded).await;
        let Some(questions) = self.settle_fetch(epoch, "reassessment fetch", outcome)? else {
            return Ok(());
        };

        debug!(questions = questions.len(), "entering reassessment");
        self.reassessment_questions = Some(questions);
        self.reassessment_answers.clear();
        self.stage = Stage::Reassessment;
        Ok(())
    }

    /// Record the learner's pick for a reassessment question by ordinal,
    /// replacing any prior pick.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `Reassessment`.
    pub fn record_reassessment_answer(
        &mut self,
        ordinal: usize,
        option: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.expect_stage(Stage::Reassessment, "record_reassessment_answer")?;
        self.reassessment_answers.record(ordinal, option);
        Ok(())
    }

    /// Score the reassessment client-side and move to `Final`.
    ///
    /// Missing answers count as incorrect. The verdict is not persisted
    /// anywhere; the upstream service has no endpoint for it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `Reassessment`.
    pub fn submit_reassessment(&mut self) -> Result<(), SessionError> {
        self.expect_stage(Stage::Reassessment, "submit_reassessment")?;
        let Some(questions) = self.reassessment_questions.as_deref() else {
            return Err(self.invalid("submit_reassessment"));
        };

        let result = score_reassessment(questions, &self.reassessment_answers);
        debug!(score = result.score_percent, passed = result.passed, "reassessment scored");
        self.final_result = Some(result);
        self.stage = Stage::Final;
        Ok(())
    }

    /// Clear all session-scoped data and return to `Home`.
    ///
    /// Callable from any stage. The topic catalog, credential, and clock
    /// survive; any response still in flight for the old epoch will be
    /// ignored when it lands.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.busy = false;
        self.last_error = None;
        self.stage = Stage::Home;
        self.selected_topic = None;
        self.started_at = None;
        self.content = None;
        self.cursor = 0;
        self.answers.clear();
        self.quiz_result = None;
        self.explanations = None;
        self.reassessment_questions = None;
        self.reassessment_answers.clear();
        self.final_result = None;
    }

    //
    // ─── GUARDS ────────────────────────────────────────────────────────────
    //

    fn expect_stage(&self, expected: Stage, intent: &'static str) -> Result<(), SessionError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(self.invalid(intent))
        }
    }

    fn invalid(&self, intent: &'static str) -> SessionError {
        SessionError::InvalidState {
            intent,
            stage: self.stage,
        }
    }

    /// Mark a request as issued: refuse re-entry while one is in flight and
    /// tag it with the current epoch.
    fn begin_fetch(&mut self) -> Result<u64, SessionError> {
        if self.busy {
            return Err(SessionError::Busy);
        }
        self.busy = true;
        self.last_error = None;
        Ok(self.epoch)
    }

    /// Resolve a finished request. Returns `Ok(None)` when the session was
    /// reset while the request was outstanding (the response is stale), and
    /// records the error text on failure.
    fn settle_fetch<T>(
        &mut self,
        issued_epoch: u64,
        what: &'static str,
        outcome: Result<T, GatewayError>,
    ) -> Result<Option<T>, SessionError> {
        self.busy = false;
        if self.epoch != issued_epoch {
            debug!(what, "stale response ignored after reset");
            return Ok(None);
        }
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(what, error = %err, "gateway call failed; staying in current stage");
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }
}

impl fmt::Debug for LearningSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LearningSession")
            .field("stage", &self.stage)
            .field("busy", &self.busy)
            .field("selected_topic", &self.selected_topic)
            .field("cursor", &self.cursor)
            .field("answered", &self.answers.len())
            .field("quiz_result", &self.quiz_result)
            .field("final_result", &self.final_result)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
