mod answers;
mod question;
mod result;
mod topic;

pub use answers::{AnswerMap, ReassessmentAnswerMap};
pub use question::{AnswerKey, ContentError, LessonContent, Question};
pub use result::{FeynmanExplanationSet, FinalResult, QuizResult, PASS_THRESHOLD};
pub use topic::{Topic, TopicCatalog, TopicCode};
