use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// User-facing quiz settings kept in the external settings store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    only_starred: bool,
    starred: Vec<QuestionId>,
}

impl QuizSettings {
    /// Build settings, dropping repeated starred ids while keeping first-seen order.
    #[must_use]
    pub fn new(only_starred: bool, starred: impl IntoIterator<Item = QuestionId>) -> Self {
        let mut unique = Vec::new();
        for id in starred {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self {
            only_starred,
            starred: unique,
        }
    }

    #[must_use]
    pub fn only_starred(&self) -> bool {
        self.only_starred
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
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
