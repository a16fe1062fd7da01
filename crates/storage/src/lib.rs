#![forbid(unsafe_code)]

pub mod question_bank;
pub mod repository;
pub mod sqlite;

pub use question_bank::{
    QuestionBankError, QuestionRecord, default_question_bank, load_question_bank,
    parse_question_bank,
};
pub use repository::{InMemoryRepository, SettingsRecord, SettingsRepository, Storage, StorageError};
