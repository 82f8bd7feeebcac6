use rand::rngs::StdRng;
use rand::seq::{SliceRandom, index};
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::model::{Card, Difficulty, ListId, QuizMode};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("{list} has {available} entries but {requested} were requested")]
    InsufficientEntries {
        list: ListId,
        requested: usize,
        available: usize,
    },
}

/// Deals the cards for one session from a catalog list.
///
/// Entries are sampled without replacement, expanded into a term card and a
/// match card each, and the whole deck is shuffled so board position says
/// nothing about pairing.
pub struct DeckBuilder<'a> {
    catalog: &'a Catalog,
    list: ListId,
    mode: QuizMode,
    difficulty: Difficulty,
}

impl<'a> DeckBuilder<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog, list: ListId) -> Self {
        Self {
            catalog,
            list,
            mode: QuizMode::default(),
            difficulty: Difficulty::default(),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: QuizMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Deal a deck using the given random source for both sampling and shuffling.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::InsufficientEntries` if the list is smaller than the
    /// difficulty's word count. The deck is never silently truncated.
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Vec<Card>, DeckError> {
        let pool = self.catalog.list(self.list);
        let word_count = self.difficulty.word_count();
        if pool.len() < word_count {
            return Err(DeckError::InsufficientEntries {
                list: self.list,
                requested: word_count,
                available: pool.len(),
            });
        }

        let mut cards = Vec::with_capacity(word_count * 2);
        for idx in index::sample(rng, pool.len(), word_count) {
            let entry = &pool[idx];
            cards.push(Card::term(entry));
            cards.push(Card::matching(entry, self.mode));
        }

        cards.shuffle(rng);
        Ok(cards)
    }

    /// Deal a deck that is reproducible when `seed` is given.
    ///
    /// Without a seed the thread-local generator is used.
    ///
    /// # Errors
    ///
    /// See [`DeckBuilder::build`].
    pub fn build_seeded(self, seed: Option<u64>) -> Result<Vec<Card>, DeckError> {
        match seed {
            Some(seed) => self.build(&mut StdRng::seed_from_u64(seed)),
            None => self.build(&mut rand::rng()),
        }
    }
}
