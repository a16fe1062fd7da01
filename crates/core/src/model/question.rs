use rand::Rng;
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::shuffle::shuffle;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question must have at least one option")]
    NoOptions,

    #[error("option text cannot be empty")]
    EmptyOption,

    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    #[error("question must have at least one correct answer")]
    NoCorrectAnswers,

    #[error("correct answer is not one of the options: {0}")]
    UnknownCorrectAnswer(String),

    #[error("single-answer question has {count} correct answers")]
    MultipleCorrectForSingle { count: usize },
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question input, as loaded from a question bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answers: Vec<String>,
    pub multiple: bool,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `Question`.
    ///
    /// The prompt is trimmed. Options keep their given order. Repeated correct
    /// answers collapse into one.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt or options are blank, options
    /// repeat, the correct answers are empty or not a subset of the options,
    /// or a single-answer question lists more than one correct answer.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        let mut seen = HashSet::with_capacity(self.options.len());
        for option in &self.options {
            if option.trim().is_empty() {
                return Err(QuestionError::EmptyOption);
            }
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }

        let mut correct_answers: Vec<String> = Vec::with_capacity(self.correct_answers.len());
        for answer in self.correct_answers {
            if !seen.contains(answer.as_str()) {
                return Err(QuestionError::UnknownCorrectAnswer(answer));
            }
            if !correct_answers.contains(&answer) {
                correct_answers.push(answer);
            }
        }
        if correct_answers.is_empty() {
            return Err(QuestionError::NoCorrectAnswers);
        }
        if !self.multiple && correct_answers.len() > 1 {
            return Err(QuestionError::MultipleCorrectForSingle {
                count: correct_answers.len(),
            });
        }

        Ok(Question {
            id: self.id,
            prompt,
            options: self.options,
            correct_answers,
            multiple: self.multiple,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single quiz item. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_answers: Vec<String>,
    multiple: bool,
}

impl Question {
    /// Build and validate a question in one step.
    ///
    /// # Errors
    ///
    /// See [`QuestionDraft::validate`].
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct_answers: impl IntoIterator<Item = impl Into<String>>,
        multiple: bool,
    ) -> Result<Self, QuestionError> {
        QuestionDraft {
            id,
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_answers: correct_answers.into_iter().map(Into::into).collect(),
            multiple,
        }
        .validate()
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answers(&self) -> &[String] {
        &self.correct_answers
    }

    /// Whether more than one option may be selected.
    #[must_use]
    pub fn multiple(&self) -> bool {
        self.multiple
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    #[must_use]
    pub fn is_correct_answer(&self, option: &str) -> bool {
        self.correct_answers.iter().any(|a| a == option)
    }

    /// Exact set comparison of `selection` against the correct answers.
    ///
    /// Order and repeated entries are ignored; any missing or extra option
    /// makes the answer incorrect.
    #[must_use]
    pub fn is_answered_by<S: AsRef<str>>(&self, selection: &[S]) -> bool {
        let chosen: HashSet<&str> = selection.iter().map(AsRef::as_ref).collect();
        let expected: HashSet<&str> = self.correct_answers.iter().map(String::as_str).collect();
        chosen == expected
    }

    /// Returns a copy of this question with its options in random order.
    #[must_use]
    pub fn with_options_shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self {
            options: shuffle(&self.options, rng),
            ..self.clone()
        }
    }
}
