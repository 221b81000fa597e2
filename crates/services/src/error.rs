//! Shared error types for the services crate.

use thiserror::Error;

use crate::session::Stage;

/// Errors surfaced by content gateway implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The requested topic or resource does not exist upstream.
    #[error("resource not found")]
    NotFound,

    /// The evaluation call was made without a valid credential. The caller
    /// should force re-authentication; that flow lives outside this core.
    #[error("missing or invalid credential")]
    Unauthorized,

    #[error("content service returned status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the learning session state machine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// An intent was invoked from a stage that does not permit it. This is
    /// an integration bug, not a user-facing condition; the presentation
    /// layer only offers valid intents per stage.
    #[error("{intent} is not valid in the {stage} stage")]
    InvalidState { intent: &'static str, stage: Stage },

    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    /// A request for this session is already in flight; the duplicate
    /// intent was refused.
    #[error("a request is already in flight")]
    Busy,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
