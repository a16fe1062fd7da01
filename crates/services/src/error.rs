//! Shared error types for the services crate.

use std::fmt;

use thiserror::Error;

use quiz_core::model::QuestionId;
use storage::repository::StorageError;

/// Which subset filter produced an empty active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Starred,
    Missed,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKind::Starred => write!(f, "starred"),
            FilterKind::Missed => write!(f, "missed"),
        }
    }
}

/// Errors emitted by the quiz session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available for quiz")]
    EmptySource,
    #[error("{filter} filter matched no questions")]
    EmptyFilterResult { filter: FilterKind },
    #[error("option is not part of the current question: {option}")]
    InvalidOptionSelection { option: String },
    #[error("unknown question: {0}")]
    UnknownQuestion(QuestionId),
    #[error("duplicate question id: {0}")]
    DuplicateQuestion(QuestionId),
}

/// Errors emitted by `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizLoopError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
