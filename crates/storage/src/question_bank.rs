use std::path::{Path, PathBuf};

use quiz_core::model::{Question, QuestionDraft, QuestionError, QuestionId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_BANK: &str = include_str!("../data/default_questions.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("failed to read question bank {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid question {id}: {source}")]
    Invalid {
        id: QuestionId,
        #[source]
        source: QuestionError,
    },
}

/// On-disk shape of a single question (field names as in the bank files).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: u64,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answers: Vec<String>,
    #[serde(default)]
    pub multiple: bool,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id().value(),
            question: question.prompt().to_owned(),
            options: question.options().to_vec(),
            correct_answers: question.correct_answers().to_vec(),
            multiple: question.multiple(),
        }
    }

    /// Convert the record into a validated domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Invalid` when validation fails.
    pub fn into_question(self) -> Result<Question, QuestionBankError> {
        let id = QuestionId::new(self.id);
        QuestionDraft {
            id,
            prompt: self.question,
            options: self.options,
            correct_answers: self.correct_answers,
            multiple: self.multiple,
        }
        .validate()
        .map_err(|source| QuestionBankError::Invalid { id, source })
    }
}

/// Parse a JSON array of question records.
///
/// # Errors
///
/// Returns `QuestionBankError::Parse` for malformed JSON and
/// `QuestionBankError::Invalid` for the first question that fails validation.
pub fn parse_question_bank(raw: &str) -> Result<Vec<Question>, QuestionBankError> {
    let records: Vec<QuestionRecord> = serde_json::from_str(raw)?;
    records
        .into_iter()
        .map(QuestionRecord::into_question)
        .collect()
}

/// Read and parse a question bank file.
///
/// # Errors
///
/// Returns `QuestionBankError::Io` if the file cannot be read, otherwise see
/// [`parse_question_bank`].
pub fn load_question_bank(path: impl AsRef<Path>) -> Result<Vec<Question>, QuestionBankError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| QuestionBankError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let questions = parse_question_bank(&raw)?;
    tracing::debug!(path = %path.display(), count = questions.len(), "loaded question bank");
    Ok(questions)
}

/// The built-in question bank shipped with the binary.
///
/// # Errors
///
/// Only fails if the embedded bank itself is malformed.
pub fn default_question_bank() -> Result<Vec<Question>, QuestionBankError> {
    parse_question_bank(DEFAULT_BANK)
}
