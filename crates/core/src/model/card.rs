use crate::model::ids::EntryId;
use crate::model::options::QuizMode;
use crate::model::vocab::VocabularyEntry;

/// Which half of a pair a card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardRole {
    Term,
    Match,
}

impl CardRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Term => "term",
            Self::Match => "match",
        }
    }
}

/// A face-down tile dealt for one session.
///
/// Cards only refer back to their entry by id; the catalog keeps ownership of
/// the vocabulary data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    card_id: String,
    entry_id: EntryId,
    display_text: String,
    role: CardRole,
    is_right_to_left: bool,
}

impl Card {
    /// The term side of an entry's pair.
    #[must_use]
    pub fn term(entry: &VocabularyEntry) -> Self {
        Self::with_role(entry, CardRole::Term, entry.term().to_owned(), false)
    }

    /// The match side of an entry's pair, rendered according to the quiz mode.
    #[must_use]
    pub fn matching(entry: &VocabularyEntry, mode: QuizMode) -> Self {
        match mode {
            QuizMode::EnglishToTranslation => Self::with_role(
                entry,
                CardRole::Match,
                entry.meaning_translation().to_owned(),
                true,
            ),
            QuizMode::EnglishToDefinition => Self::with_role(
                entry,
                CardRole::Match,
                entry.meaning_definition().to_owned(),
                false,
            ),
        }
    }

    fn with_role(
        entry: &VocabularyEntry,
        role: CardRole,
        display_text: String,
        is_right_to_left: bool,
    ) -> Self {
        Self {
            card_id: format!("{}-{}", entry.id(), role.as_str()),
            entry_id: entry.id().clone(),
            display_text,
            role,
            is_right_to_left,
        }
    }

    #[must_use]
    pub fn card_id(&self) -> &str {
        &self.card_id
    }

    #[must_use]
    pub fn entry_id(&self) -> &EntryId {
        &self.entry_id
    }

    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    #[must_use]
    pub fn role(&self) -> CardRole {
        self.role
    }

    #[must_use]
    pub fn is_right_to_left(&self) -> bool {
        self.is_right_to_left
    }
}
