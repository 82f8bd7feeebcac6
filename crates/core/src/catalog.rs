use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::model::{EntryId, ListId, VocabularyEntry};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate entry id {id}")]
    DuplicateEntry { id: EntryId },

    #[error("{list} appears more than once")]
    DuplicateList { list: ListId },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    lists: Vec<ListFile>,
}

#[derive(Debug, Deserialize)]
struct ListFile {
    id: ListId,
    entries: Vec<VocabularyEntry>,
}

/// Read-only vocabulary lists, keyed by list id.
///
/// Loaded once at startup and shared by reference; nothing mutates it afterwards.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    lists: HashMap<ListId, Vec<VocabularyEntry>>,
    index: HashMap<EntryId, (ListId, usize)>,
}

impl Catalog {
    /// The catalog embedded in the crate.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded data is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse a catalog from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON and
    /// `CatalogError::DuplicateEntry`/`DuplicateList` when keys repeat.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        let mut catalog = Self::default();
        for list in file.lists {
            catalog.insert_list(list.id, list.entries)?;
        }
        Ok(catalog)
    }

    /// Build a catalog from in-memory lists.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when an entry id or list id repeats.
    pub fn from_lists(
        lists: impl IntoIterator<Item = (ListId, Vec<VocabularyEntry>)>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for (list, entries) in lists {
            catalog.insert_list(list, entries)?;
        }
        Ok(catalog)
    }

    fn insert_list(
        &mut self,
        list: ListId,
        entries: Vec<VocabularyEntry>,
    ) -> Result<(), CatalogError> {
        if self.lists.contains_key(&list) {
            return Err(CatalogError::DuplicateList { list });
        }
        for (pos, entry) in entries.iter().enumerate() {
            if self
                .index
                .insert(entry.id().clone(), (list, pos))
                .is_some()
            {
                return Err(CatalogError::DuplicateEntry {
                    id: entry.id().clone(),
                });
            }
        }
        self.lists.insert(list, entries);
        Ok(())
    }

    /// Entries of a list in authored order; empty for a list the catalog lacks.
    #[must_use]
    pub fn list(&self, list: ListId) -> &[VocabularyEntry] {
        self.lists.get(&list).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn entry(&self, id: &EntryId) -> Option<&VocabularyEntry> {
        let (list, pos) = self.index.get(id)?;
        self.lists.get(list)?.get(*pos)
    }

    /// Total number of entries across every list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    #[test]
    fn builtin_lists_exceed_hard_threshold() {
        let catalog = Catalog::builtin().unwrap();
        for list in ListId::ALL {
            assert!(
                catalog.list(list).len() > Difficulty::Hard.word_count(),
                "{list} is too small"
            );
        }
    }

    #[test]
    fn entry_lookup_finds_builtin_word() {
        let catalog = Catalog::builtin().unwrap();
        let entry = catalog.entry(&EntryId::new("b08")).unwrap();
        assert_eq!(entry.term(), "invent");
        assert_eq!(entry.part_of_speech(), "verb");
        assert_eq!(entry.family(), Some("invention (n.), inventor (n.)"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let raw = r#"{"lists":[
            {"id":"List A","entries":[
                {"id":"x","term":"t","pos":"noun","meaning_translation":"م","meaning_definition":"d"}
            ]},
            {"id":"List B","entries":[
                {"id":"x","term":"u","pos":"verb","meaning_translation":"ن","meaning_definition":"e"}
            ]}
        ]}"#;
        let err = Catalog::from_json(raw).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateEntry { id } if id.as_str() == "x"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Catalog::from_json("{\"lists\": 3}").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn missing_list_is_empty() {
        let catalog = Catalog::from_lists([(ListId::ListA, Vec::new())]).unwrap();
        assert!(catalog.list(ListId::ListC).is_empty());
        assert!(catalog.is_empty());
    }
}
