use std::fmt;

/// Where the learner currently is in the instructional sequence.
///
/// `Home` is the initial stage; `Final` is terminal until a reset. The only
/// other way back to `Home` is an explicit reset (or passing the checkpoint
/// quiz, which completes the module).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Home,
    Teaching,
    Quiz,
    Report,
    Feynman,
    Reassessment,
    Final,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Home => "home",
            Stage::Teaching => "teaching",
            Stage::Quiz => "quiz",
            Stage::Report => "report",
            Stage::Feynman => "feynman",
            Stage::Reassessment => "reassessment",
            Stage::Final => "final",
        };
        f.write_str(name)
    }
}

/// Aggregated view of checkpoint-quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    /// 0-based index of the question currently shown.
    pub current: usize,
    pub on_last_question: bool,
}
