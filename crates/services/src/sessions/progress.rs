use quiz_core::model::QuestionId;

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub score: usize,
    pub is_complete: bool,
}

/// End-of-pass figures for the completion screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub score: usize,
    pub total: usize,
    pub missed: Vec<QuestionId>,
}

impl QuizSummary {
    /// Every question in the pass was answered correctly.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.score == self.total
    }
}
