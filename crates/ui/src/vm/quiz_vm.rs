use quiz_core::model::QuestionId;
use services::QuizSession;

/// Highlight state of a single option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Idle,
    Selected,
    /// Shown after reveal for every correct answer, picked or not.
    Correct,
    /// Shown after reveal for a picked option that is not correct.
    Wrong,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub text: String,
    pub checked: bool,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub id: QuestionId,
    pub prompt: String,
    pub multiple: bool,
    pub starred: bool,
    pub options: Vec<OptionVm>,
    /// "3/10" style position counter.
    pub counter: String,
    pub primary_label: &'static str,
    pub revealed: bool,
    pub verdict: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionVm {
    pub score: usize,
    pub total: usize,
    pub headline: String,
    pub can_retry_missed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizScreen {
    Question(QuestionVm),
    Completed(CompletionVm),
}

pub const CHECK_LABEL: &str = "Check";
pub const NEXT_LABEL: &str = "Next";
pub const MULTIPLE_HINT: &str = "(More than one answer may be correct)";

/// Map the session into the screen the presentation layer should show.
#[must_use]
pub fn map_quiz_screen(session: &QuizSession) -> QuizScreen {
    if session.is_complete() {
        let summary = session.summary();
        return QuizScreen::Completed(CompletionVm {
            score: summary.score,
            total: summary.total,
            headline: format!("Quiz over! Score: {}/{}", summary.score, summary.total),
            can_retry_missed: !summary.is_perfect(),
        });
    }

    let question = session.current_question();
    let revealed = session.is_revealed();
    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let checked = session.is_selected(text);
            let state = match (revealed, checked) {
                (true, _) if question.is_correct_answer(text) => OptionState::Correct,
                (true, true) => OptionState::Wrong,
                (false, true) => OptionState::Selected,
                _ => OptionState::Idle,
            };
            OptionVm {
                index,
                text: text.clone(),
                checked,
                state,
            }
        })
        .collect();

    QuizScreen::Question(QuestionVm {
        id: question.id(),
        prompt: question.prompt().to_owned(),
        multiple: question.multiple(),
        starred: session.is_starred(question.id()),
        options,
        counter: format!("{}/{}", session.position() + 1, session.total()),
        primary_label: if revealed { NEXT_LABEL } else { CHECK_LABEL },
        revealed,
        verdict: session.last_answer_correct(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::RandomSource;
    use quiz_core::model::{Question, QuizSettings};

    fn transport_session() -> QuizSession {
        let q = Question::new(
            QuestionId::new(2),
            "Which protocols belong to the transport layer?",
            ["TCP", "UDP", "IP"],
            ["TCP", "UDP"],
            true,
        )
        .unwrap();
        QuizSession::start(vec![q], &QuizSettings::default(), RandomSource::seeded(4)).unwrap()
    }

    fn question_vm(session: &QuizSession) -> QuestionVm {
        match map_quiz_screen(session) {
            QuizScreen::Question(vm) => vm,
            QuizScreen::Completed(_) => panic!("expected question screen"),
        }
    }

    fn state_of(vm: &QuestionVm, text: &str) -> OptionState {
        vm.options.iter().find(|o| o.text == text).unwrap().state
    }

    #[test]
    fn unrevealed_marks_selection_only() {
        let mut session = transport_session();
        session.select_option("IP").unwrap();

        let vm = question_vm(&session);
        assert_eq!(vm.primary_label, CHECK_LABEL);
        assert_eq!(vm.counter, "1/1");
        assert!(vm.multiple);
        assert_eq!(state_of(&vm, "IP"), OptionState::Selected);
        assert_eq!(state_of(&vm, "TCP"), OptionState::Idle);
        assert_eq!(vm.verdict, None);
    }

    #[test]
    fn revealed_marks_correct_and_wrong() {
        let mut session = transport_session();
        session.select_option("IP").unwrap();
        session.select_option("TCP").unwrap();
        session.advance();

        let vm = question_vm(&session);
        assert_eq!(vm.primary_label, NEXT_LABEL);
        assert_eq!(state_of(&vm, "TCP"), OptionState::Correct);
        assert_eq!(state_of(&vm, "UDP"), OptionState::Correct);
        assert_eq!(state_of(&vm, "IP"), OptionState::Wrong);
        assert_eq!(vm.verdict, Some(false));
    }

    #[test]
    fn completion_offers_retry_only_after_mistakes() {
        let mut session = transport_session();
        session.advance();
        session.advance();
        match map_quiz_screen(&session) {
            QuizScreen::Completed(done) => {
                assert_eq!((done.score, done.total), (0, 1));
                assert!(done.can_retry_missed);
                assert_eq!(done.headline, "Quiz over! Score: 0/1");
            }
            QuizScreen::Question(_) => panic!("expected completion screen"),
        }

        session.restart(false).unwrap();
        session.select_option("TCP").unwrap();
        session.select_option("UDP").unwrap();
        session.advance();
        session.advance();
        match map_quiz_screen(&session) {
            QuizScreen::Completed(done) => assert!(!done.can_retry_missed),
            QuizScreen::Question(_) => panic!("expected completion screen"),
        }
    }

    #[test]
    fn starred_flag_follows_session() {
        let mut session = transport_session();
        session.toggle_star(QuestionId::new(2)).unwrap();
        assert!(question_vm(&session).starred);
    }
}
