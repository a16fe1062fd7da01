mod plan;
mod progress;
mod service;
mod workflow;

// Public API of the quiz session subsystem.
pub use crate::error::QuizError;
pub use plan::{ActiveFilter, ActiveSetBuilder};
pub use progress::{QuizProgress, QuizSummary};
pub use service::{AdvanceOutcome, QuizPhase, QuizSession};
pub use workflow::QuizLoopService;
