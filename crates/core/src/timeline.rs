use std::collections::BTreeMap;
use std::time::Duration;

use crate::model::{Card, SessionSetup, SessionToken};
use crate::session::{GameSignal, PendingResolution, SessionError, SessionState};

const TICK_MS: u64 = 1_000;

/// Drives a [`SessionState`] on a virtual millisecond clock.
///
/// Resolutions returned by flips are queued at `now + delay` and fired by
/// [`GameTimeline::advance`], interleaved with one timer tick per elapsed
/// second. Callbacks never overlap: each one sees every mutation scheduled
/// before it. Restarting does not drain the queue; leftover resolutions fire
/// and are rejected by the session token check.
#[derive(Debug, Default)]
pub struct GameTimeline {
    session: SessionState,
    now_ms: u64,
    next_tick_ms: u64,
    queue: BTreeMap<(u64, u64), PendingResolution>,
    seq: u64,
}

impl GameTimeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session; the first tick lands one second from now.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` for a malformed deck.
    pub fn start(
        &mut self,
        deck: Vec<Card>,
        setup: SessionSetup,
    ) -> Result<SessionToken, SessionError> {
        let token = self.session.start(deck, setup)?;
        self.next_tick_ms = self.now_ms.saturating_add(TICK_MS);
        Ok(token)
    }

    /// Forward a flip to the session, scheduling its resolution if it was the second card.
    ///
    /// Returns `true` when the flip was accepted.
    pub fn request_flip(&mut self, position: usize) -> bool {
        let before = self.session.flipped().len();
        if let Some(pending) = self.session.request_flip(position) {
            let due = self.now_ms.saturating_add(duration_ms(pending.delay()));
            self.queue.insert((due, self.seq), pending);
            self.seq += 1;
            return true;
        }
        self.session.flipped().len() > before
    }

    /// Move virtual time forward, firing ticks and due resolutions in order.
    ///
    /// A tick and a resolution due at the same instant fire tick first.
    pub fn advance(&mut self, delta: Duration) {
        let target = self.now_ms.saturating_add(duration_ms(delta));
        loop {
            let tick_due = (self.next_tick_ms <= target).then_some(self.next_tick_ms);
            let resolution_due = self
                .queue
                .keys()
                .next()
                .map(|&(due, _)| due)
                .filter(|&due| due <= target);

            match (tick_due, resolution_due) {
                (Some(tick), Some(due)) if tick <= due => self.fire_tick(tick),
                (Some(tick), None) => self.fire_tick(tick),
                (_, Some(_)) => self.fire_resolution(),
                (None, None) => break,
            }
        }
        self.now_ms = target;
    }

    fn fire_tick(&mut self, at: u64) {
        self.now_ms = at;
        self.session.tick();
        self.next_tick_ms = at.saturating_add(TICK_MS);
    }

    fn fire_resolution(&mut self) {
        if let Some(((due, _), pending)) = self.queue.pop_first() {
            self.now_ms = due;
            self.session.resolve(&pending);
        }
    }

    /// Drain signals raised since the last call.
    pub fn take_signals(&mut self) -> Vec<GameSignal> {
        self.session.take_signals()
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Resolutions still queued, stale ones included.
    #[must_use]
    pub fn scheduled(&self) -> usize {
        self.queue.len()
    }
}

fn duration_ms(delta: Duration) -> u64 {
    u64::try_from(delta.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, EntryId, ListId, QuizMode, VocabularyEntry};
    use crate::session::{MATCH_DELAY, MISMATCH_DELAY, SessionStatus};

    fn setup() -> SessionSetup {
        SessionSetup::new(
            "Noor",
            "11C",
            ListId::ListC,
            QuizMode::EnglishToDefinition,
            Difficulty::Easy,
        )
    }

    /// 0 = A term, 1 = B term, 2 = A match, 3 = B match.
    fn deck() -> Vec<Card> {
        let a = VocabularyEntry::new("A", "alpha", "noun", "ا", "first");
        let b = VocabularyEntry::new("B", "beta", "noun", "ب", "second");
        vec![
            Card::term(&a),
            Card::term(&b),
            Card::matching(&a, QuizMode::EnglishToDefinition),
            Card::matching(&b, QuizMode::EnglishToDefinition),
        ]
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn match_resolves_after_match_delay() {
        let mut timeline = GameTimeline::new();
        timeline.start(deck(), setup()).unwrap();
        assert!(timeline.request_flip(0));
        assert!(timeline.request_flip(2));

        timeline.advance(MATCH_DELAY - ms(1));
        assert_eq!(timeline.session().status(), SessionStatus::Resolving);
        timeline.advance(ms(1));
        assert_eq!(timeline.session().status(), SessionStatus::Running);
        assert_eq!(timeline.session().score(), 10);
    }

    #[test]
    fn mismatch_waits_for_longer_delay() {
        let mut timeline = GameTimeline::new();
        timeline.start(deck(), setup()).unwrap();
        timeline.request_flip(0);
        timeline.request_flip(1);

        timeline.advance(MATCH_DELAY);
        assert_eq!(timeline.session().flipped(), &[0, 1]);
        timeline.advance(MISMATCH_DELAY - MATCH_DELAY);
        assert!(timeline.session().flipped().is_empty());
        assert_eq!(timeline.session().score(), 0);
    }

    #[test]
    fn ticks_follow_virtual_seconds() {
        let mut timeline = GameTimeline::new();
        timeline.start(deck(), setup()).unwrap();
        timeline.advance(ms(2_500));
        assert_eq!(timeline.session().elapsed_seconds(), 2);
        timeline.advance(ms(500));
        assert_eq!(timeline.session().elapsed_seconds(), 3);
    }

    #[test]
    fn timer_keeps_counting_through_resolution() {
        let mut timeline = GameTimeline::new();
        timeline.start(deck(), setup()).unwrap();
        timeline.advance(ms(700));
        timeline.request_flip(0);
        timeline.request_flip(1);
        timeline.advance(ms(400));
        assert_eq!(timeline.session().status(), SessionStatus::Resolving);
        assert_eq!(timeline.session().elapsed_seconds(), 1);
    }

    #[test]
    fn clock_stops_at_completion() {
        let mut timeline = GameTimeline::new();
        timeline.start(deck(), setup()).unwrap();
        timeline.request_flip(0);
        timeline.request_flip(2);
        timeline.advance(ms(1_000));
        timeline.request_flip(1);
        timeline.request_flip(3);
        timeline.advance(ms(60_000));

        let session = timeline.session();
        assert_eq!(session.status(), SessionStatus::Complete);
        assert_eq!(session.elapsed_seconds(), 1);
        assert_eq!(session.summary().unwrap().elapsed_seconds(), 1);
    }

    #[test]
    fn stale_resolution_does_not_touch_new_session() {
        let mut timeline = GameTimeline::new();
        timeline.start(deck(), setup()).unwrap();
        timeline.request_flip(0);
        timeline.request_flip(2);
        timeline.advance(ms(100));

        timeline.start(deck(), setup()).unwrap();
        timeline.take_signals();
        timeline.request_flip(1);
        assert_eq!(timeline.scheduled(), 1);

        timeline.advance(MATCH_DELAY);
        let session = timeline.session();
        assert_eq!(session.matched_count(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.flipped(), &[1]);
        assert_eq!(timeline.scheduled(), 0);
        assert_eq!(timeline.take_signals(), vec![GameSignal::Flipped(1)]);
    }

    #[test]
    fn resolutions_fire_in_scheduling_order() {
        let mut timeline = GameTimeline::new();
        timeline.start(deck(), setup()).unwrap();
        timeline.request_flip(0);
        timeline.request_flip(2);
        timeline.advance(MATCH_DELAY);
        timeline.request_flip(1);
        timeline.request_flip(3);
        timeline.advance(MATCH_DELAY);

        let matched: Vec<_> = timeline
            .take_signals()
            .into_iter()
            .filter_map(|signal| match signal {
                GameSignal::Matched(id) => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(matched, vec![EntryId::new("A"), EntryId::new("B")]);
    }

    #[test]
    fn rejected_flip_reports_false() {
        let mut timeline = GameTimeline::new();
        assert!(!timeline.request_flip(0));
        timeline.start(deck(), setup()).unwrap();
        assert!(timeline.request_flip(0));
        assert!(!timeline.request_flip(0));
    }
}
