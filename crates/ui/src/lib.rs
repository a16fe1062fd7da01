//! Presentation-agnostic view models over the quiz session.
//!
//! Front ends render these snapshots and send user actions back as
//! [`vm::QuizIntent`]s; they never mutate the session directly.

pub mod vm;

pub use vm::{
    CompletionVm, IntentOutcome, MULTIPLE_HINT, OptionState, OptionVm, QuestionVm, QuizIntent,
    QuizScreen, SettingsOverlayVm, ViewError, dispatch, map_quiz_screen,
};
