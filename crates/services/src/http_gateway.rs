use std::env;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use vihar_core::model::{
    AnswerMap, FeynmanExplanationSet, LessonContent, Question, QuizResult, TopicCatalog, TopicCode,
};

use crate::error::GatewayError;
use crate::gateway::ContentGateway;

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base_url: String,
}

impl GatewayConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("VIHAR_API_URL").unwrap_or_else(|_| "http://localhost:8000".into());
        Self { base_url }
    }

    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// reqwest-backed gateway against the remote content/evaluation service.
#[derive(Clone)]
pub struct HttpContentGateway {
    client: Client,
    config: GatewayConfig,
}

impl HttpContentGateway {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GatewayConfig::from_env())
    }

    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn check_status(response: Response) -> Result<Response, GatewayError> {
        match response.status() {
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GatewayError::Unauthorized),
            status if !status.is_success() => Err(GatewayError::HttpStatus(status)),
            _ => Ok(response),
        }
    }
}

#[async_trait]
impl ContentGateway for HttpContentGateway {
    async fn fetch_topics(&self) -> Result<TopicCatalog, GatewayError> {
        let response = self
            .client
            .get(self.config.endpoint("topics"))
            .send()
            .await?;
        let catalog = Self::check_status(response)?.json().await?;
        Ok(catalog)
    }

    async fn fetch_content(&self, topic: &TopicCode) -> Result<LessonContent, GatewayError> {
        let response = self
            .client
            .get(self.config.endpoint(&format!("content/{topic}")))
            .send()
            .await?;
        let body: ContentResponse = Self::check_status(response)?.json().await?;
        // The wire payload has no topic field; stamp the requested code.
        LessonContent::new(topic.clone(), body.context, body.questions)
            .map_err(|_| GatewayError::NotFound)
    }

    async fn evaluate_quiz(
        &self,
        topic: &TopicCode,
        answers: &AnswerMap,
        auth_token: &str,
    ) -> Result<QuizResult, GatewayError> {
        let payload = EvaluateRequest {
            topic,
            user_answers: answers,
        };
        let response = self
            .client
            .post(self.config.endpoint("evaluate"))
            .bearer_auth(auth_token)
            .json(&payload)
            .send()
            .await?;
        let result = Self::check_status(response)?.json().await?;
        Ok(result)
    }

    async fn fetch_feynman_explanations(
        &self,
        topic: &TopicCode,
        concepts: &[String],
    ) -> Result<FeynmanExplanationSet, GatewayError> {
        let payload = FeynmanRequest { topic, concepts };
        let response = self
            .client
            .post(self.config.endpoint("feynman_explain"))
            .json(&payload)
            .send()
            .await?;
        let explanations: BTreeMap<String, String> =
            Self::check_status(response)?.json().await?;
        Ok(explanations)
    }

    async fn fetch_reassessment(
        &self,
        topic: &TopicCode,
        excluded_texts: &[String],
    ) -> Result<Vec<Question>, GatewayError> {
        let payload = ReassessmentRequest {
            topic,
            previous_questions: excluded_texts,
        };
        let response = self
            .client
            .post(self.config.endpoint("reassessment"))
            .json(&payload)
            .send()
            .await?;
        let questions = Self::check_status(response)?.json().await?;
        Ok(questions)
    }
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    context: String,
    questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
struct EvaluateRequest<'a> {
    topic: &'a TopicCode,
    user_answers: &'a AnswerMap,
}

#[derive(Debug, Serialize)]
struct FeynmanRequest<'a> {
    topic: &'a TopicCode,
    concepts: &'a [String],
}

#[derive(Debug, Serialize)]
struct ReassessmentRequest<'a> {
    topic: &'a TopicCode,
    previous_questions: &'a [String],
}
