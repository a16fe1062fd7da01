#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::RandomSource;

pub use error::{FilterKind, QuizError, QuizLoopError};
pub use sessions::{
    ActiveFilter, ActiveSetBuilder, AdvanceOutcome, QuizLoopService, QuizPhase, QuizProgress,
    QuizSession, QuizSummary,
};
