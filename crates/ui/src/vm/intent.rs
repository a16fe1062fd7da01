use services::{AdvanceOutcome, FilterKind, QuizError, QuizLoopError, QuizLoopService, QuizSession};
use thiserror::Error;

/// User actions a front end can send to the quiz.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    /// Pick or toggle the option at this display index.
    Select(usize),
    /// The primary button: check, then next.
    Advance,
    Restart { missed_only: bool },
    ToggleStar,
    SetStarredFilter(bool),
    FullReset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentOutcome {
    Updated,
    Advanced(AdvanceOutcome),
    Starred(bool),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("That option is not available.")]
    InvalidOption,
    #[error("There are no {0} questions to ask.")]
    EmptyFilter(FilterKind),
    #[error("Something went wrong. Please try again.")]
    Unknown,
}

impl From<QuizError> for ViewError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::InvalidOptionSelection { .. } => ViewError::InvalidOption,
            QuizError::EmptyFilterResult { filter } => ViewError::EmptyFilter(filter),
            _ => ViewError::Unknown,
        }
    }
}

impl From<QuizLoopError> for ViewError {
    fn from(err: QuizLoopError) -> Self {
        match err {
            QuizLoopError::Quiz(err) => err.into(),
            other => {
                tracing::error!(error = %other, "quiz workflow failed");
                ViewError::Unknown
            }
        }
    }
}

/// Apply an intent to the session, persisting settings where needed.
///
/// # Errors
///
/// Returns `ViewError::InvalidOption` for out-of-range selections,
/// `ViewError::EmptyFilter` when a restart filter matches nothing, and
/// `ViewError::Unknown` for storage failures.
pub async fn dispatch(
    quiz_loop: &QuizLoopService,
    session: &mut QuizSession,
    intent: QuizIntent,
) -> Result<IntentOutcome, ViewError> {
    match intent {
        QuizIntent::Select(index) => {
            session.select_index(index)?;
            Ok(IntentOutcome::Updated)
        }
        QuizIntent::Advance => Ok(IntentOutcome::Advanced(session.advance())),
        QuizIntent::Restart { missed_only } => {
            session.restart(missed_only)?;
            Ok(IntentOutcome::Updated)
        }
        QuizIntent::ToggleStar => {
            let id = session.current_question().id();
            let starred = quiz_loop.toggle_star(session, id).await?;
            Ok(IntentOutcome::Starred(starred))
        }
        QuizIntent::SetStarredFilter(enabled) => {
            quiz_loop.apply_starred_filter(session, enabled).await?;
            Ok(IntentOutcome::Updated)
        }
        QuizIntent::FullReset => {
            quiz_loop.full_reset(session).await?;
            Ok(IntentOutcome::Updated)
        }
    }
}
