mod intent;
mod quiz_vm;
mod settings_vm;

pub use intent::{IntentOutcome, QuizIntent, ViewError, dispatch};
pub use quiz_vm::{
    CompletionVm, MULTIPLE_HINT, OptionState, OptionVm, QuestionVm, QuizScreen, map_quiz_screen,
};
pub use settings_vm::SettingsOverlayVm;
