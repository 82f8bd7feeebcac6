use serde::{Deserialize, Serialize};

use crate::model::ids::EntryId;

/// A single vocabulary item from the catalog. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    id: EntryId,
    term: String,
    #[serde(rename = "pos")]
    part_of_speech: String,
    meaning_translation: String,
    meaning_definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    family: Option<String>,
}

impl VocabularyEntry {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        term: impl Into<String>,
        part_of_speech: impl Into<String>,
        meaning_translation: impl Into<String>,
        meaning_definition: impl Into<String>,
    ) -> Self {
        Self {
            id: EntryId::new(id),
            term: term.into(),
            part_of_speech: part_of_speech.into(),
            meaning_translation: meaning_translation.into(),
            meaning_definition: meaning_definition.into(),
            family: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn part_of_speech(&self) -> &str {
        &self.part_of_speech
    }

    #[must_use]
    pub fn meaning_translation(&self) -> &str {
        &self.meaning_translation
    }

    #[must_use]
    pub fn meaning_definition(&self) -> &str {
        &self.meaning_definition
    }

    /// Related word forms noted by the list author, if any.
    #[must_use]
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }
}
