use rand::rngs::StdRng;
use std::collections::HashSet;
use tracing::debug;

use quiz_core::RandomSource;
use quiz_core::model::{Question, QuestionId, QuizSettings};
use quiz_core::shuffle;

use super::plan::{ActiveFilter, ActiveSetBuilder};
use super::progress::{QuizProgress, QuizSummary};
use crate::error::QuizError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where the session stands with respect to the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Waiting for the user to pick options and check.
    Unrevealed,
    /// Correctness of the current question is shown.
    Revealed,
    /// The pass is finished.
    Completed,
}

/// What a call to [`QuizSession::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Revealed { correct: bool },
    Moved { position: usize },
    Completed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz session.
///
/// Owns the frozen source set, the active pass over a subset of it, and all
/// per-pass state. Presentation code reads through the accessors and drives the
/// session only through its operations.
pub struct QuizSession {
    source: Vec<Question>,
    active: Vec<Question>,
    position: usize,
    selection: Vec<String>,
    revealed: bool,
    last_correct: Option<bool>,
    score: usize,
    missed: Vec<QuestionId>,
    starred: Vec<QuestionId>,
    restrict_to_starred: bool,
    completed: bool,
    rng: StdRng,
}

impl QuizSession {
    /// Start a session over `questions`.
    ///
    /// Questions and their options are shuffled once into the frozen source
    /// set. When `settings.only_starred()` is set, the first pass asks only the
    /// starred questions. Starred ids that are not in `questions` are dropped.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptySource` if no questions are given,
    /// `QuizError::DuplicateQuestion` if two questions share an id, and
    /// `QuizError::EmptyFilterResult` if the starred filter matches nothing.
    pub fn start(
        questions: Vec<Question>,
        settings: &QuizSettings,
        random: RandomSource,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptySource);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        for q in &questions {
            if !seen.insert(q.id()) {
                return Err(QuizError::DuplicateQuestion(q.id()));
            }
        }

        let mut rng = random.rng();
        let source: Vec<Question> = shuffle(&questions, &mut rng)
            .iter()
            .map(|q| q.with_options_shuffled(&mut rng))
            .collect();

        let starred: Vec<QuestionId> = settings
            .starred()
            .iter()
            .copied()
            .filter(|id| seen.contains(id))
            .collect();
        if starred.len() != settings.starred().len() {
            debug!(
                dropped = settings.starred().len() - starred.len(),
                "ignoring starred ids missing from question bank"
            );
        }

        let filter = if settings.only_starred() {
            ActiveFilter::Starred(&starred)
        } else {
            ActiveFilter::All
        };
        let active = ActiveSetBuilder::new(&source)
            .with_filter(filter)
            .with_shuffle(false)
            .build(&mut rng)?;

        debug!(
            source = source.len(),
            active = active.len(),
            only_starred = settings.only_starred(),
            "quiz session started"
        );

        Ok(Self {
            source,
            active,
            position: 0,
            selection: Vec::new(),
            revealed: false,
            last_correct: None,
            score: 0,
            missed: Vec::new(),
            starred,
            restrict_to_starred: settings.only_starred(),
            completed: false,
            rng,
        })
    }

    // ─── Read access ──────────────────────────────────────────────────────────

    /// Questions asked in the current pass, in asking order.
    #[must_use]
    pub fn active(&self) -> &[Question] {
        &self.active
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.active[self.position]
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of questions in the current pass.
    #[must_use]
    pub fn total(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.position + 1 == self.active.len()
    }

    #[must_use]
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    #[must_use]
    pub fn is_selected(&self, option: &str) -> bool {
        self.selection.iter().any(|s| s == option)
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Correctness of the current question once revealed.
    #[must_use]
    pub fn last_answer_correct(&self) -> Option<bool> {
        self.last_correct
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn missed(&self) -> &[QuestionId] {
        &self.missed
    }

    #[must_use]
    pub fn has_missed(&self) -> bool {
        !self.missed.is_empty()
    }

    #[must_use]
    pub fn starred(&self) -> &[QuestionId] {
        &self.starred
    }

    #[must_use]
    pub fn is_starred(&self, id: QuestionId) -> bool {
        self.starred.contains(&id)
    }

    #[must_use]
    pub fn restrict_to_starred(&self) -> bool {
        self.restrict_to_starred
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        if self.completed {
            QuizPhase::Completed
        } else if self.revealed {
            QuizPhase::Revealed
        } else {
            QuizPhase::Unrevealed
        }
    }

    /// Returns a summary of the current pass progress.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.total();
        let answered = if self.completed {
            total
        } else {
            self.position + usize::from(self.revealed)
        };
        QuizProgress {
            position: self.position,
            total,
            answered,
            remaining: total.saturating_sub(answered),
            score: self.score,
            is_complete: self.completed,
        }
    }

    #[must_use]
    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            score: self.score,
            total: self.total(),
            missed: self.missed.clone(),
        }
    }

    /// Snapshot of the settings that belong in the external store.
    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        QuizSettings::new(self.restrict_to_starred, self.starred.iter().copied())
    }

    // ─── Operations ───────────────────────────────────────────────────────────

    /// Pick or toggle an option on the current question.
    ///
    /// Ignored once the question is revealed or the pass is complete.
    /// Single-answer questions replace the selection; multi-answer questions
    /// toggle membership.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidOptionSelection` if `option` is not one of
    /// the current question's options. The selection is left unchanged.
    pub fn select_option(&mut self, option: &str) -> Result<(), QuizError> {
        if self.revealed || self.completed {
            debug!(option, "selection ignored after reveal");
            return Ok(());
        }

        let question = &self.active[self.position];
        if !question.has_option(option) {
            return Err(QuizError::InvalidOptionSelection {
                option: option.to_string(),
            });
        }

        if question.multiple() {
            if let Some(index) = self.selection.iter().position(|s| s == option) {
                self.selection.remove(index);
            } else {
                self.selection.push(option.to_string());
            }
        } else {
            self.selection.clear();
            self.selection.push(option.to_string());
        }
        Ok(())
    }

    /// Select the option at `index` of the current question's display order.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidOptionSelection` if `index` is out of range.
    pub fn select_index(&mut self, index: usize) -> Result<(), QuizError> {
        let Some(option) = self.current_question().options().get(index).cloned() else {
            return Err(QuizError::InvalidOptionSelection {
                option: format!("#{}", index + 1),
            });
        };
        self.select_option(&option)
    }

    /// The primary action: check the current answer, then move on.
    ///
    /// Unrevealed: scores the selection and reveals. Revealed: moves to the
    /// next question, or completes the pass on the last one. Once complete
    /// further calls change nothing.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.completed {
            return AdvanceOutcome::Completed;
        }

        if !self.revealed {
            let question = &self.active[self.position];
            let id = question.id();
            let correct = question.is_answered_by(&self.selection);
            if correct {
                self.score += 1;
            } else if !self.missed.contains(&id) {
                self.missed.push(id);
            }
            self.revealed = true;
            self.last_correct = Some(correct);
            debug!(question = %id, correct, score = self.score, "answer revealed");
            return AdvanceOutcome::Revealed { correct };
        }

        if self.is_last() {
            self.completed = true;
            debug!(score = self.score, total = self.total(), "quiz pass completed");
            return AdvanceOutcome::Completed;
        }

        self.position += 1;
        self.selection.clear();
        self.revealed = false;
        self.last_correct = None;
        AdvanceOutcome::Moved {
            position: self.position,
        }
    }

    /// Begin a new pass.
    ///
    /// With `missed_only` the pass asks the missed questions and keeps the
    /// missed list. Otherwise it asks everything (or the starred subset when
    /// the starred filter is on) and clears the missed list.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyFilterResult` if the chosen filter matches no
    /// questions; the session is left untouched in that case.
    pub fn restart(&mut self, missed_only: bool) -> Result<(), QuizError> {
        let filter = if missed_only {
            ActiveFilter::Missed(&self.missed)
        } else if self.restrict_to_starred {
            ActiveFilter::Starred(&self.starred)
        } else {
            ActiveFilter::All
        };
        let active = ActiveSetBuilder::new(&self.source)
            .with_filter(filter)
            .build(&mut self.rng)?;

        if !missed_only {
            self.missed.clear();
        }
        self.active = active;
        self.position = 0;
        self.selection.clear();
        self.revealed = false;
        self.last_correct = None;
        self.score = 0;
        self.completed = false;
        debug!(missed_only, total = self.active.len(), "quiz restarted");
        Ok(())
    }

    /// Takes effect on the next full restart only.
    pub fn set_starred_filter(&mut self, enabled: bool) {
        self.restrict_to_starred = enabled;
    }

    /// Star or unstar a question; returns whether it is starred afterwards.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::UnknownQuestion` if `id` is not in the source set.
    pub fn toggle_star(&mut self, id: QuestionId) -> Result<bool, QuizError> {
        if !self.source.iter().any(|q| q.id() == id) {
            return Err(QuizError::UnknownQuestion(id));
        }
        if let Some(index) = self.starred.iter().position(|s| *s == id) {
            self.starred.remove(index);
            Ok(false)
        } else {
            self.starred.push(id);
            Ok(true)
        }
    }

    pub fn clear_stars(&mut self) {
        self.starred.clear();
    }
}
