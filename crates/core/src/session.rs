use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::model::{Card, CardRole, EntryId, SessionSetup, SessionSummary, SessionToken};

/// Delay between the second flip of a matching pair and its resolution.
pub const MATCH_DELAY: Duration = Duration::from_millis(600);

/// Delay between the second flip of a mismatched pair and its resolution.
/// Longer than [`MATCH_DELAY`] so both values can be memorised before they hide.
pub const MISMATCH_DELAY: Duration = Duration::from_millis(1200);

pub const POINTS_PER_PAIR: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("deck has no cards")]
    EmptyDeck,

    #[error("deck has an odd number of cards: {len}")]
    OddDeck { len: usize },

    #[error("entry {entry_id} does not have exactly one term and one match card")]
    UnpairedEntry { entry_id: EntryId },
}

//
// ─── STATUS & SIGNALS ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    NotStarted,
    Running,
    /// Two cards are face-up and a resolution is scheduled.
    Resolving,
    Complete,
}

/// Notifications for the presentation and audio collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameSignal {
    Flipped(usize),
    Matched(EntryId),
    Mismatched,
    Completed(SessionSummary),
    HintReady(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Match,
    Mismatch,
}

impl Verdict {
    #[must_use]
    pub fn delay(self) -> Duration {
        match self {
            Self::Match => MATCH_DELAY,
            Self::Mismatch => MISMATCH_DELAY,
        }
    }
}

/// The two positions flipped in a session, captured when the second flip lands.
///
/// Handed to whatever schedules the delayed resolution and passed back to
/// [`SessionState::resolve`] when the delay elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingResolution {
    token: SessionToken,
    first: usize,
    second: usize,
    verdict: Verdict,
}

impl PendingResolution {
    #[must_use]
    pub fn token(&self) -> SessionToken {
        self.token
    }

    #[must_use]
    pub fn positions(&self) -> (usize, usize) {
        (self.first, self.second)
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.verdict.delay()
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
struct ActiveSession {
    token: SessionToken,
    setup: SessionSetup,
}

/// Flip/match state machine for one board.
///
/// `NotStarted → Running → (Resolving ⇄ Running) → Complete`. Resolving is left
/// only through [`SessionState::resolve`]. Driver calls that do not apply to the
/// current state are ignored rather than reported as errors.
#[derive(Default)]
pub struct SessionState {
    deck: Vec<Card>,
    active: Option<ActiveSession>,
    flipped: Vec<usize>,
    matched: HashSet<EntryId>,
    score: u32,
    elapsed_seconds: u32,
    status: SessionStatus,
    pending: Option<PendingResolution>,
    summary: Option<SessionSummary>,
    signals: VecDeque<GameSignal>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a session on the given deck.
    ///
    /// Everything from a previous session is discarded, including undrained
    /// signals. A resolution scheduled by the previous session becomes stale:
    /// its token no longer matches, so [`SessionState::resolve`] ignores it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the deck is empty, odd-sized, or contains an
    /// entry without exactly one term card and one match card.
    pub fn start(
        &mut self,
        deck: Vec<Card>,
        setup: SessionSetup,
    ) -> Result<SessionToken, SessionError> {
        validate_deck(&deck)?;

        let token = SessionToken::generate();
        self.deck = deck;
        self.active = Some(ActiveSession { token, setup });
        self.flipped.clear();
        self.matched.clear();
        self.score = 0;
        self.elapsed_seconds = 0;
        self.pending = None;
        self.summary = None;
        self.signals.clear();
        self.status = SessionStatus::Running;
        Ok(token)
    }

    /// Turn a card face-up.
    ///
    /// Ignored unless the session is running with fewer than two cards up and
    /// the position is in range, not already up, and not part of a matched pair.
    /// The second accepted flip moves the session to `Resolving` and returns the
    /// resolution to schedule after [`PendingResolution::delay`].
    pub fn request_flip(&mut self, position: usize) -> Option<PendingResolution> {
        if self.status != SessionStatus::Running
            || self.flipped.len() >= 2
            || self.flipped.contains(&position)
        {
            return None;
        }
        let token = self.active.as_ref()?.token;
        let card = self.deck.get(position)?;
        if self.matched.contains(card.entry_id()) {
            return None;
        }

        self.flipped.push(position);
        self.signals.push_back(GameSignal::Flipped(position));
        let &[first, second] = self.flipped.as_slice() else {
            return None;
        };

        let verdict = if self.deck[first].entry_id() == self.deck[second].entry_id() {
            Verdict::Match
        } else {
            Verdict::Mismatch
        };
        let pending = PendingResolution {
            token,
            first,
            second,
            verdict,
        };
        self.status = SessionStatus::Resolving;
        self.pending = Some(pending.clone());
        Some(pending)
    }

    /// Apply a scheduled resolution.
    ///
    /// Returns `None` without touching state when the resolution belongs to an
    /// earlier session or no longer describes the face-up pair.
    pub fn resolve(&mut self, resolution: &PendingResolution) -> Option<Verdict> {
        if self.status != SessionStatus::Resolving
            || self.token() != Some(resolution.token)
            || self.pending.as_ref() != Some(resolution)
        {
            return None;
        }

        let first = self.deck.get(resolution.first)?.entry_id().clone();
        let second = self.deck.get(resolution.second)?.entry_id();
        let verdict = if &first == second {
            Verdict::Match
        } else {
            Verdict::Mismatch
        };

        self.pending = None;
        self.flipped.clear();
        match verdict {
            Verdict::Match => {
                self.matched.insert(first.clone());
                self.score = self.score.saturating_add(POINTS_PER_PAIR);
                self.signals.push_back(GameSignal::Matched(first));
                if self.matched.len() == self.pair_count() {
                    self.complete();
                } else {
                    self.status = SessionStatus::Running;
                }
            }
            Verdict::Mismatch => {
                self.signals.push_back(GameSignal::Mismatched);
                self.status = SessionStatus::Running;
            }
        }
        Some(verdict)
    }

    fn complete(&mut self) {
        self.status = SessionStatus::Complete;
        if let Some(active) = &self.active {
            let summary = SessionSummary::new(&active.setup, self.score, self.elapsed_seconds);
            self.signals
                .push_back(GameSignal::Completed(summary.clone()));
            self.summary = Some(summary);
        }
    }

    /// Advance the session timer by one second.
    ///
    /// Counts while `Running` and also while `Resolving`; frozen otherwise.
    pub fn tick(&mut self) {
        if matches!(
            self.status,
            SessionStatus::Running | SessionStatus::Resolving
        ) {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        }
    }

    /// Drain queued signals in the order they were raised.
    pub fn take_signals(&mut self) -> Vec<GameSignal> {
        self.signals.drain(..).collect()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn token(&self) -> Option<SessionToken> {
        self.active.as_ref().map(|active| active.token)
    }

    #[must_use]
    pub fn setup(&self) -> Option<&SessionSetup> {
        self.active.as_ref().map(|active| &active.setup)
    }

    #[must_use]
    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.deck.len() / 2
    }

    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    #[must_use]
    pub fn matched_entries(&self) -> &HashSet<EntryId> {
        &self.matched
    }

    /// Positions currently face-up and unresolved, in flip order.
    #[must_use]
    pub fn flipped(&self) -> &[usize] {
        &self.flipped
    }

    #[must_use]
    pub fn is_flipped(&self, position: usize) -> bool {
        self.flipped.contains(&position)
    }

    #[must_use]
    pub fn is_matched(&self, position: usize) -> bool {
        self.deck
            .get(position)
            .is_some_and(|card| self.matched.contains(card.entry_id()))
    }

    /// Summary captured when the last pair was matched.
    #[must_use]
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// Term cards whose pair is still on the board.
    #[must_use]
    pub fn unmatched_terms(&self) -> Vec<&Card> {
        self.deck
            .iter()
            .filter(|card| card.role() == CardRole::Term)
            .filter(|card| !self.matched.contains(card.entry_id()))
            .collect()
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("status", &self.status)
            .field("token", &self.token())
            .field("deck_len", &self.deck.len())
            .field("flipped", &self.flipped)
            .field("matched_len", &self.matched.len())
            .field("score", &self.score)
            .field("elapsed_seconds", &self.elapsed_seconds)
            .finish_non_exhaustive()
    }
}

fn validate_deck(deck: &[Card]) -> Result<(), SessionError> {
    if deck.is_empty() {
        return Err(SessionError::EmptyDeck);
    }
    if deck.len() % 2 != 0 {
        return Err(SessionError::OddDeck { len: deck.len() });
    }

    let mut roles: HashMap<&EntryId, (usize, usize)> = HashMap::new();
    for card in deck {
        let slot = roles.entry(card.entry_id()).or_default();
        match card.role() {
            CardRole::Term => slot.0 += 1,
            CardRole::Match => slot.1 += 1,
        }
    }
    if let Some((entry_id, _)) = roles.iter().find(|(_, counts)| **counts != (1, 1)) {
        return Err(SessionError::UnpairedEntry {
            entry_id: (*entry_id).clone(),
        });
    }
    Ok(())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
