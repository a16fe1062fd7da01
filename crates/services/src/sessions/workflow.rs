use std::sync::Arc;

use tracing::{info, warn};

use quiz_core::RandomSource;
use quiz_core::model::{Question, QuestionId, QuizSettings};
use storage::repository::SettingsRepository;

use super::service::QuizSession;
use crate::error::{FilterKind, QuizError, QuizLoopError};

/// Orchestrates a quiz session with the external settings store.
///
/// The session itself never touches storage; this service loads settings at
/// start, writes them back when the user changes them, and performs the full
/// reset.
#[derive(Clone)]
pub struct QuizLoopService {
    settings: Arc<dyn SettingsRepository>,
    random: RandomSource,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsRepository>) -> Self {
        Self {
            settings,
            random: RandomSource::default(),
        }
    }

    #[must_use]
    pub fn with_random(mut self, random: RandomSource) -> Self {
        self.random = random;
        self
    }

    /// Load stored settings (defaults when none are stored).
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Storage` on store failures.
    pub async fn load_settings(&self) -> Result<QuizSettings, QuizLoopError> {
        Ok(self.settings.get_settings().await?.unwrap_or_default())
    }

    /// Start a session using the stored settings.
    ///
    /// If the stored starred filter matches none of `questions`, the first pass
    /// falls back to all questions; the filter flag stays on for later restarts.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Storage` if settings cannot be loaded, or
    /// `QuizLoopError::Quiz` if the question list is empty or has duplicate ids.
    pub async fn start(&self, questions: Vec<Question>) -> Result<QuizSession, QuizLoopError> {
        let settings = self.load_settings().await?;
        let session = match QuizSession::start(questions.clone(), &settings, self.random) {
            Ok(session) => session,
            Err(QuizError::EmptyFilterResult {
                filter: FilterKind::Starred,
            }) => {
                warn!("stored starred filter matches no questions; asking all of them");
                let fallback = QuizSettings::new(false, settings.starred().iter().copied());
                let mut session = QuizSession::start(questions, &fallback, self.random)?;
                session.set_starred_filter(true);
                session
            }
            Err(err) => return Err(err.into()),
        };
        info!(
            total = session.total(),
            starred = session.starred().len(),
            only_starred = session.restrict_to_starred(),
            "quiz started"
        );
        Ok(session)
    }

    /// Persist the session's current settings.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Storage` on store failures.
    pub async fn save_settings(&self, session: &QuizSession) -> Result<(), QuizLoopError> {
        self.settings.save_settings(&session.settings()).await?;
        Ok(())
    }

    /// Apply the settings overlay's starred-only choice and persist it.
    ///
    /// The session is only updated once the store accepted the new settings.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Storage` on store failures.
    pub async fn apply_starred_filter(
        &self,
        session: &mut QuizSession,
        enabled: bool,
    ) -> Result<(), QuizLoopError> {
        let next = QuizSettings::new(enabled, session.starred().iter().copied());
        self.settings.save_settings(&next).await?;
        session.set_starred_filter(enabled);
        Ok(())
    }

    /// Star or unstar a question and persist the new starred set.
    ///
    /// On a store failure the star is rolled back.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Quiz` for unknown ids and
    /// `QuizLoopError::Storage` on store failures.
    pub async fn toggle_star(
        &self,
        session: &mut QuizSession,
        id: QuestionId,
    ) -> Result<bool, QuizLoopError> {
        let starred = session.toggle_star(id)?;
        if let Err(err) = self.save_settings(session).await {
            warn!(%id, error = %err, "could not persist star; rolling back");
            session.toggle_star(id)?;
            return Err(err);
        }
        Ok(starred)
    }

    /// Clear the external store, drop stars and the filter, then restart with
    /// every question.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Storage` if the store cannot be cleared.
    pub async fn full_reset(&self, session: &mut QuizSession) -> Result<(), QuizLoopError> {
        self.settings.clear().await?;
        session.clear_stars();
        session.set_starred_filter(false);
        session.restart(false)?;
        info!(total = session.total(), "quiz reset");
        Ok(())
    }
}
