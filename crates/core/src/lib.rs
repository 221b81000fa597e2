#![forbid(unsafe_code)]

pub mod evaluate;
pub mod model;
pub mod score;

pub use evaluate::is_correct;
pub use score::{score_quiz, score_reassessment};
