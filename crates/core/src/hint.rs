use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::catalog::Catalog;
use crate::model::{EntryId, SessionToken};
use crate::session::{SessionState, SessionStatus};

/// How long a delivered hint stays on screen, counted from when the fetch finished.
pub const HINT_DISPLAY_SECS: i64 = 8;

/// What the hint collaborator needs to produce a hint for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRequest {
    pub token: SessionToken,
    pub entry_id: EntryId,
    pub term: String,
    pub part_of_speech: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintTicket {
    /// Nothing left to hint at; no fetch should be made.
    Skipped,
    Fetch(HintRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveHint {
    pub text: String,
    pub expires_at: DateTime<Utc>,
}

/// Availability and display lifetime of hints.
///
/// The gate does not serialise requests: several fetches may be in flight and
/// whichever finishes last wins. `is_fetching` is exposed for the UI to grey
/// out its button, nothing more. Fetches are counted per session, so one left
/// over from before a restart does not mark the new board as fetching.
#[derive(Debug, Default)]
pub struct HintGate {
    active: Option<ActiveHint>,
    in_flight: Vec<SessionToken>,
}

impl HintGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a random unmatched entry to ask about.
    ///
    /// Returns [`HintTicket::Skipped`] without changing anything when no session
    /// is in play or every pair is already matched.
    pub fn begin<R: Rng + ?Sized>(
        &mut self,
        session: &SessionState,
        catalog: &Catalog,
        rng: &mut R,
    ) -> HintTicket {
        if !matches!(
            session.status(),
            SessionStatus::Running | SessionStatus::Resolving
        ) {
            return HintTicket::Skipped;
        }
        let Some(token) = session.token() else {
            return HintTicket::Skipped;
        };
        let candidates = session.unmatched_terms();
        let Some(entry) = candidates
            .choose(rng)
            .and_then(|card| catalog.entry(card.entry_id()))
        else {
            return HintTicket::Skipped;
        };

        self.in_flight.push(token);
        HintTicket::Fetch(HintRequest {
            token,
            entry_id: entry.id().clone(),
            term: entry.term().to_owned(),
            part_of_speech: entry.part_of_speech().to_owned(),
        })
    }

    /// Record the outcome of a fetch started by [`HintGate::begin`].
    ///
    /// The hint replaces any visible one and expires [`HINT_DISPLAY_SECS`] after
    /// `now`. Results for a session other than `current` are dropped. Returns the
    /// text to display when the hint was stored.
    pub fn finish(
        &mut self,
        request: &HintRequest,
        text: &str,
        now: DateTime<Utc>,
        current: Option<SessionToken>,
    ) -> Option<String> {
        if let Some(idx) = self.in_flight.iter().position(|t| *t == request.token) {
            self.in_flight.swap_remove(idx);
        }
        if current != Some(request.token) {
            return None;
        }

        let text = format!("Hint for \"{}\": {}", request.term, text);
        self.active = Some(ActiveHint {
            text: text.clone(),
            expires_at: now + Duration::seconds(HINT_DISPLAY_SECS),
        });
        Some(text)
    }

    /// The visible hint, if it has not expired yet.
    #[must_use]
    pub fn active_hint(&self, now: DateTime<Utc>) -> Option<&str> {
        self.active
            .as_ref()
            .filter(|hint| now < hint.expires_at)
            .map(|hint| hint.text.as_str())
    }

    /// Drop an expired hint. Returns `true` if one was removed.
    pub fn clear_expired(&mut self, now: DateTime<Utc>) -> bool {
        if self
            .active
            .as_ref()
            .is_some_and(|hint| now >= hint.expires_at)
        {
            self.active = None;
            return true;
        }
        false
    }

    /// Hide the current hint; in-flight fetches are still counted.
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Whether a fetch started in session `current` has not finished yet.
    #[must_use]
    pub fn is_fetching(&self, current: Option<SessionToken>) -> bool {
        current.is_some_and(|token| self.in_flight.contains(&token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::DeckBuilder;
    use crate::model::{Difficulty, ListId, QuizMode, SessionSetup};
    use crate::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn running_session(catalog: &Catalog) -> SessionState {
        let deck = DeckBuilder::new(catalog, ListId::ListA)
            .with_difficulty(Difficulty::Easy)
            .build_seeded(Some(11))
            .unwrap();
        let mut session = SessionState::new();
        session
            .start(
                deck,
                SessionSetup::new(
                    "Rami",
                    "8B",
                    ListId::ListA,
                    QuizMode::EnglishToTranslation,
                    Difficulty::Easy,
                ),
            )
            .unwrap();
        session
    }

    fn complete(session: &mut SessionState) {
        while session.status() != SessionStatus::Complete {
            let target = session.unmatched_terms()[0].entry_id().clone();
            let positions: Vec<usize> = session
                .deck()
                .iter()
                .enumerate()
                .filter(|(_, card)| card.entry_id() == &target)
                .map(|(pos, _)| pos)
                .collect();
            session.request_flip(positions[0]);
            let pending = session.request_flip(positions[1]).unwrap();
            session.resolve(&pending);
        }
    }

    #[test]
    fn begin_picks_an_unmatched_entry() {
        let catalog = Catalog::builtin().unwrap();
        let session = running_session(&catalog);
        let mut gate = HintGate::new();
        let mut rng = StdRng::seed_from_u64(5);

        let HintTicket::Fetch(request) = gate.begin(&session, &catalog, &mut rng) else {
            panic!("expected a fetch");
        };
        assert!(gate.is_fetching(session.token()));
        assert_eq!(Some(request.token), session.token());
        let entry = catalog.entry(&request.entry_id).unwrap();
        assert_eq!(request.term, entry.term());
        assert_eq!(request.part_of_speech, entry.part_of_speech());
        assert!(!session.matched_entries().contains(&request.entry_id));
    }

    #[test]
    fn all_matched_skips_without_fetching() {
        let catalog = Catalog::builtin().unwrap();
        let mut session = running_session(&catalog);
        complete(&mut session);

        let mut gate = HintGate::new();
        let ticket = gate.begin(&session, &catalog, &mut StdRng::seed_from_u64(1));
        assert_eq!(ticket, HintTicket::Skipped);
        assert!(!gate.is_fetching(session.token()));
    }

    #[test]
    fn finished_hint_expires_after_display_window() {
        let catalog = Catalog::builtin().unwrap();
        let session = running_session(&catalog);
        let mut gate = HintGate::new();
        let HintTicket::Fetch(request) =
            gate.begin(&session, &catalog, &mut StdRng::seed_from_u64(2))
        else {
            panic!("expected a fetch");
        };

        let done_at = fixed_now();
        let shown = gate
            .finish(&request, "She tried hard.", done_at, session.token())
            .unwrap();
        assert_eq!(shown, format!("Hint for \"{}\": She tried hard.", request.term));
        assert!(!gate.is_fetching(session.token()));

        let almost = done_at + Duration::seconds(HINT_DISPLAY_SECS - 1);
        assert_eq!(gate.active_hint(almost), Some(shown.as_str()));
        assert!(!gate.clear_expired(almost));

        let expired = done_at + Duration::seconds(HINT_DISPLAY_SECS);
        assert_eq!(gate.active_hint(expired), None);
        assert!(gate.clear_expired(expired));
    }

    #[test]
    fn later_hint_overwrites_earlier_one() {
        let catalog = Catalog::builtin().unwrap();
        let session = running_session(&catalog);
        let mut gate = HintGate::new();
        let mut rng = StdRng::seed_from_u64(3);
        let (HintTicket::Fetch(first), HintTicket::Fetch(second)) = (
            gate.begin(&session, &catalog, &mut rng),
            gate.begin(&session, &catalog, &mut rng),
        ) else {
            panic!("expected two fetches");
        };

        let now = fixed_now();
        gate.finish(&first, "one", now, session.token());
        assert!(gate.is_fetching(session.token()));
        let shown = gate
            .finish(&second, "two", now + Duration::seconds(3), session.token())
            .unwrap();
        assert!(shown.ends_with("two"));
        assert_eq!(
            gate.active_hint(now + Duration::seconds(9)),
            Some(shown.as_str())
        );
    }

    #[test]
    fn result_for_previous_session_is_discarded() {
        let catalog = Catalog::builtin().unwrap();
        let session = running_session(&catalog);
        let mut gate = HintGate::new();
        let HintTicket::Fetch(request) =
            gate.begin(&session, &catalog, &mut StdRng::seed_from_u64(4))
        else {
            panic!("expected a fetch");
        };

        let restarted = running_session(&catalog);
        assert!(!gate.is_fetching(restarted.token()));
        assert!(gate.is_fetching(session.token()));
        assert!(
            gate.finish(&request, "late", fixed_now(), restarted.token())
                .is_none()
        );
        assert!(!gate.is_fetching(session.token()));
        assert_eq!(gate.active_hint(fixed_now()), None);
    }

    #[test]
    fn no_session_means_no_hint() {
        let catalog = Catalog::builtin().unwrap();
        let mut gate = HintGate::new();
        let ticket = gate.begin(&SessionState::new(), &catalog, &mut rand::rng());
        assert_eq!(ticket, HintTicket::Skipped);
    }
}
