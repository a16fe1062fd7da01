use std::io::{self, Write};

use services::{AdvanceOutcome, QuizLoopService, QuizSession};
use tokio::io::{AsyncBufReadExt, BufReader};
use ui::{
    IntentOutcome, MULTIPLE_HINT, OptionState, QuizIntent, QuizScreen, SettingsOverlayVm,
    dispatch, map_quiz_screen,
};

const HELP: &str = "\
commands:
  <number>   pick / toggle an option
  <enter>    check the answer, then go to the next question
  *          star / unstar the current question
  r          restart with all questions
  m          restart with the missed questions only
  s          open settings
  x          reset everything (clears saved settings)
  q          quit";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Intent(QuizIntent),
    OpenSettings,
    Draft(bool),
    SaveSettings,
    CloseSettings,
    Help,
    Quit,
    Unknown,
}

fn parse_command(line: &str, overlay_open: bool) -> Command {
    let input = line.trim();
    if overlay_open {
        return match input {
            "y" | "on" => Command::Draft(true),
            "n" | "off" => Command::Draft(false),
            "save" => Command::SaveSettings,
            "" | "close" => Command::CloseSettings,
            "q" => Command::Quit,
            _ => Command::Unknown,
        };
    }

    match input {
        "" | "n" | "next" => Command::Intent(QuizIntent::Advance),
        "*" => Command::Intent(QuizIntent::ToggleStar),
        "r" => Command::Intent(QuizIntent::Restart { missed_only: false }),
        "m" => Command::Intent(QuizIntent::Restart { missed_only: true }),
        "x" => Command::Intent(QuizIntent::FullReset),
        "s" => Command::OpenSettings,
        "?" | "h" | "help" => Command::Help,
        "q" | "quit" => Command::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if n > 0 => Command::Intent(QuizIntent::Select(n - 1)),
            _ => Command::Unknown,
        },
    }
}

fn option_marker(state: OptionState, multiple: bool) -> &'static str {
    match (state, multiple) {
        (OptionState::Correct, _) => "[+]",
        (OptionState::Wrong, _) => "[-]",
        (OptionState::Selected, true) => "[x]",
        (OptionState::Selected, false) => "(*)",
        (OptionState::Idle, true) => "[ ]",
        (OptionState::Idle, false) => "( )",
    }
}

fn render(
    out: &mut impl Write,
    screen: &QuizScreen,
    overlay: &SettingsOverlayVm,
    notice: Option<&str>,
) -> io::Result<()> {
    writeln!(out)?;
    if overlay.is_open() {
        let value = if overlay.draft_only_starred() { "on" } else { "off" };
        writeln!(out, "Settings")?;
        writeln!(out, "  Only starred questions: {value}")?;
        writeln!(out, "  y / n to change, save to keep, close to discard")?;
    } else {
        match screen {
            QuizScreen::Question(q) => {
                let star = if q.starred { " *" } else { "" };
                writeln!(out, "{}{star}", q.counter)?;
                writeln!(out, "{}", q.prompt)?;
                if q.multiple {
                    writeln!(out, "{MULTIPLE_HINT}")?;
                }
                for option in &q.options {
                    let marker = option_marker(option.state, q.multiple);
                    writeln!(out, "  {marker} {}. {}", option.index + 1, option.text)?;
                }
                match q.verdict {
                    Some(true) => writeln!(out, "Correct!")?,
                    Some(false) => writeln!(out, "Incorrect.")?,
                    None => {}
                }
                writeln!(out, "[enter] {}", q.primary_label)?;
            }
            QuizScreen::Completed(done) => {
                writeln!(out, "{}", done.headline)?;
                writeln!(out, "  r  restart")?;
                if done.can_retry_missed {
                    writeln!(out, "  m  restart with missed questions only")?;
                }
            }
        }
    }
    if let Some(notice) = notice {
        writeln!(out, "{notice}")?;
    }
    write!(out, "> ")?;
    out.flush()
}

/// Notice for intents the current screen does not offer.
fn unavailable(intent: QuizIntent, screen: &QuizScreen) -> Option<&'static str> {
    match (intent, screen) {
        (QuizIntent::Restart { missed_only: true }, QuizScreen::Completed(done))
            if done.can_retry_missed =>
        {
            None
        }
        (QuizIntent::Restart { missed_only: true }, _) => {
            Some("retrying missed questions is offered once a pass ends with mistakes")
        }
        _ => None,
    }
}

fn describe(outcome: IntentOutcome) -> Option<String> {
    match outcome {
        IntentOutcome::Starred(true) => Some("starred".into()),
        IntentOutcome::Starred(false) => Some("unstarred".into()),
        IntentOutcome::Advanced(AdvanceOutcome::Revealed { correct }) => {
            tracing::debug!(correct, "answer checked");
            None
        }
        IntentOutcome::Advanced(_) | IntentOutcome::Updated => None,
    }
}

/// Drive the session from stdin until the user quits or input ends.
///
/// # Errors
///
/// Returns `io::Error` if reading stdin or writing stdout fails.
pub async fn run(quiz_loop: &QuizLoopService, session: &mut QuizSession) -> io::Result<()> {
    let mut overlay = SettingsOverlayVm::new(session.restrict_to_starred());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = io::stdout();
    let mut notice: Option<String> = None;

    loop {
        render(
            &mut stdout,
            &map_quiz_screen(session),
            &overlay,
            notice.take().as_deref(),
        )?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let intent = match parse_command(&line, overlay.is_open()) {
            Command::Quit => break,
            Command::Help => {
                notice = Some(HELP.into());
                continue;
            }
            Command::Unknown => {
                notice = Some(format!("unknown command {:?}, type ? for help", line.trim()));
                continue;
            }
            Command::OpenSettings => {
                overlay = SettingsOverlayVm::new(session.restrict_to_starred());
                overlay.open();
                continue;
            }
            Command::Draft(value) => {
                overlay.set_only_starred(value);
                continue;
            }
            Command::CloseSettings => {
                overlay.close();
                continue;
            }
            Command::SaveSettings => {
                notice = Some("settings apply from the next restart".into());
                QuizIntent::SetStarredFilter(overlay.save())
            }
            Command::Intent(intent) => intent,
        };

        if let Some(text) = unavailable(intent, &map_quiz_screen(session)) {
            notice = Some(text.into());
            continue;
        }

        match dispatch(quiz_loop, session, intent).await {
            Ok(outcome) => {
                if let Some(text) = describe(outcome) {
                    notice = Some(text);
                }
            }
            Err(err) => {
                overlay = SettingsOverlayVm::new(session.restrict_to_starred());
                notice = Some(err.to_string());
            }
        }
    }

    writeln!(stdout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::RandomSource;
    use quiz_core::model::{Question, QuestionId, QuizSettings};

    fn render_to_string(screen: &QuizScreen, overlay: &SettingsOverlayVm) -> String {
        let mut buf = Vec::new();
        render(&mut buf, screen, overlay, Some("hello")).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn session() -> QuizSession {
        let q = Question::new(
            QuestionId::new(2),
            "Which protocols belong to the transport layer?",
            ["TCP", "UDP"],
            ["TCP", "UDP"],
            true,
        )
        .unwrap();
        QuizSession::start(vec![q], &QuizSettings::default(), RandomSource::seeded(1)).unwrap()
    }

    #[test]
    fn parses_quiz_commands() {
        assert_eq!(parse_command("", false), Command::Intent(QuizIntent::Advance));
        assert_eq!(parse_command(" 3 ", false), Command::Intent(QuizIntent::Select(2)));
        assert_eq!(parse_command("0", false), Command::Unknown);
        assert_eq!(
            parse_command("m", false),
            Command::Intent(QuizIntent::Restart { missed_only: true })
        );
        assert_eq!(parse_command("*", false), Command::Intent(QuizIntent::ToggleStar));
        assert_eq!(parse_command("x", false), Command::Intent(QuizIntent::FullReset));
        assert_eq!(parse_command("s", false), Command::OpenSettings);
        assert_eq!(parse_command("q", false), Command::Quit);
        assert_eq!(parse_command("banana", false), Command::Unknown);
    }

    #[test]
    fn parses_overlay_commands() {
        assert_eq!(parse_command("y", true), Command::Draft(true));
        assert_eq!(parse_command("n", true), Command::Draft(false));
        assert_eq!(parse_command("save", true), Command::SaveSettings);
        assert_eq!(parse_command("", true), Command::CloseSettings);
        assert_eq!(parse_command("3", true), Command::Unknown);
    }

    #[test]
    fn renders_question_with_hint_and_counter() {
        let s = session();
        let text = render_to_string(&map_quiz_screen(&s), &SettingsOverlayVm::default());
        assert!(text.contains("1/1"));
        assert!(text.contains(MULTIPLE_HINT));
        assert!(text.contains("[ ] 1."));
        assert!(text.contains("[enter] Check"));
        assert!(text.contains("hello"));
    }

    #[test]
    fn renders_reveal_markers() {
        let mut s = session();
        s.select_option("TCP").unwrap();
        s.advance();
        let text = render_to_string(&map_quiz_screen(&s), &SettingsOverlayVm::default());
        assert!(text.contains("[+]"));
        assert!(text.contains("Incorrect."));
        assert!(text.contains("[enter] Next"));
    }

    #[test]
    fn renders_completion_with_retry() {
        let mut s = session();
        s.advance();
        s.advance();
        let text = render_to_string(&map_quiz_screen(&s), &SettingsOverlayVm::default());
        assert!(text.contains("Quiz over! Score: 0/1"));
        assert!(text.contains("missed questions only"));
    }

    #[test]
    fn missed_retry_is_gated_on_completion_with_mistakes() {
        let retry = QuizIntent::Restart { missed_only: true };
        let mut s = session();
        assert!(unavailable(retry, &map_quiz_screen(&s)).is_some());
        assert!(unavailable(QuizIntent::Advance, &map_quiz_screen(&s)).is_none());

        s.advance();
        s.advance();
        assert!(unavailable(retry, &map_quiz_screen(&s)).is_none());

        s.restart(true).unwrap();
        s.select_option("TCP").unwrap();
        s.select_option("UDP").unwrap();
        s.advance();
        s.advance();
        assert!(s.has_missed());
        assert!(unavailable(retry, &map_quiz_screen(&s)).is_some());
        assert!(
            unavailable(QuizIntent::Restart { missed_only: false }, &map_quiz_screen(&s)).is_none()
        );
    }

    #[test]
    fn renders_overlay_draft() {
        let s = session();
        let mut overlay = SettingsOverlayVm::new(false);
        overlay.open();
        overlay.set_only_starred(true);
        let text = render_to_string(&map_quiz_screen(&s), &overlay);
        assert!(text.contains("Only starred questions: on"));
    }
}
