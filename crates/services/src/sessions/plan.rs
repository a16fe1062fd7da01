use rand::Rng;

use quiz_core::model::{Question, QuestionId};
use quiz_core::shuffle;

use crate::error::{FilterKind, QuizError};

/// Which questions of the source set a pass should ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveFilter<'a> {
    All,
    Starred(&'a [QuestionId]),
    Missed(&'a [QuestionId]),
}

impl ActiveFilter<'_> {
    #[must_use]
    pub fn kind(&self) -> Option<FilterKind> {
        match self {
            ActiveFilter::All => None,
            ActiveFilter::Starred(_) => Some(FilterKind::Starred),
            ActiveFilter::Missed(_) => Some(FilterKind::Missed),
        }
    }

    fn admits(&self, id: QuestionId) -> bool {
        match self {
            ActiveFilter::All => true,
            ActiveFilter::Starred(ids) | ActiveFilter::Missed(ids) => ids.contains(&id),
        }
    }
}

/// Derives an active set from the frozen source set.
pub struct ActiveSetBuilder<'a> {
    source: &'a [Question],
    filter: ActiveFilter<'a>,
    shuffle: bool,
}

impl<'a> ActiveSetBuilder<'a> {
    #[must_use]
    pub fn new(source: &'a [Question]) -> Self {
        Self {
            source,
            filter: ActiveFilter::All,
            shuffle: true,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: ActiveFilter<'a>) -> Self {
        self.filter = filter;
        self
    }

    /// Enable or disable reordering of questions and their options.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Select the questions admitted by the filter, optionally reshuffled.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyFilterResult` when a starred or missed filter
    /// admits nothing, and `QuizError::EmptySource` when the source is empty.
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Vec<Question>, QuizError> {
        let selected: Vec<Question> = self
            .source
            .iter()
            .filter(|q| self.filter.admits(q.id()))
            .cloned()
            .collect();

        if selected.is_empty() {
            return Err(match self.filter.kind() {
                Some(filter) => QuizError::EmptyFilterResult { filter },
                None => QuizError::EmptySource,
            });
        }

        if !self.shuffle {
            return Ok(selected);
        }

        Ok(shuffle(&selected, rng)
            .iter()
            .map(|q| q.with_options_shuffled(rng))
            .collect())
    }
}
