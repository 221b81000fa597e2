mod service;
mod stage;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use service::LearningSession;
pub use stage::{QuizProgress, Stage};
