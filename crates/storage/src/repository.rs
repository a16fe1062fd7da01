use async_trait::async_trait;
use quiz_core::model::{QuestionId, QuizSettings};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of the quiz settings.
///
/// Keeps storage concerns (flat id list, integer flag) out of the domain type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsRecord {
    pub only_starred: bool,
    pub starred: Vec<u64>,
}

impl SettingsRecord {
    #[must_use]
    pub fn from_settings(settings: &QuizSettings) -> Self {
        Self {
            only_starred: settings.only_starred(),
            starred: settings.starred().iter().map(QuestionId::value).collect(),
        }
    }

    #[must_use]
    pub fn into_settings(self) -> QuizSettings {
        QuizSettings::new(
            self.only_starred,
            self.starred.into_iter().map(QuestionId::new),
        )
    }
}

/// Contract for the external settings store.
///
/// The quiz session never touches this directly; the workflow layer loads,
/// saves and clears it around session operations.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetch stored settings, `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get_settings(&self) -> Result<Option<QuizSettings>, StorageError>;

    /// Persist settings, replacing anything stored before.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the settings cannot be stored.
    async fn save_settings(&self, settings: &QuizSettings) -> Result<(), StorageError>;

    /// Remove everything from the store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be cleared.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    settings: Arc<Mutex<Option<SettingsRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            settings: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl SettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Option<QuizSettings>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone().map(SettingsRecord::into_settings))
    }

    async fn save_settings(&self, settings: &QuizSettings) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(SettingsRecord::from_settings(settings));
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub settings: Arc<dyn SettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let settings: Arc<dyn SettingsRepository> = Arc::new(InMemoryRepository::new());
        Self { settings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_returns_none() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_settings().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn round_trips_and_clears_settings() {
        let repo = InMemoryRepository::new();
        let settings = QuizSettings::new(true, [QuestionId::new(3), QuestionId::new(1)]);
        repo.save_settings(&settings).await.unwrap();

        let fetched = repo.get_settings().await.unwrap().expect("saved settings");
        assert_eq!(fetched, settings);

        repo.clear().await.unwrap();
        assert!(repo.get_settings().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let repo = InMemoryRepository::new();
        let other = repo.clone();
        repo.save_settings(&QuizSettings::new(false, [QuestionId::new(9)]))
            .await
            .unwrap();
        let fetched = other.get_settings().await.unwrap().unwrap();
        assert!(fetched.is_starred(QuestionId::new(9)));
    }

    #[test]
    fn record_mirrors_settings() {
        let settings = QuizSettings::new(true, [QuestionId::new(5)]);
        let record = SettingsRecord::from_settings(&settings);
        assert_eq!(record.starred, vec![5]);
        assert!(record.only_starred);
        assert_eq!(record.into_settings(), settings);
    }
}
