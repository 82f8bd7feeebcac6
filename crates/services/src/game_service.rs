use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use match_core::model::{EntryId, SessionSetup, SessionSummary, SessionToken};
use match_core::{
    Catalog, Clock, DeckBuilder, GameSignal, GameTimeline, HintGate, HintRequest, HintTicket,
    SessionState,
};

use crate::error::GameError;
use crate::report_service::{ReportJob, ReportStatus, ResultReporter};

/// Load the catalog from a JSON file, or the built-in one when no path is given.
///
/// # Errors
///
/// Returns `GameError::CatalogRead` if the file cannot be read and
/// `GameError::Catalog` if its contents are invalid.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, GameError> {
    let Some(path) = path else {
        return Ok(Catalog::builtin()?);
    };
    let raw = std::fs::read_to_string(path).map_err(|source| GameError::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Catalog::from_json(&raw)?)
}

/// Single owner of one player's game: deals decks, forwards driver input to
/// the timeline, and keeps hint and result-reporting state beside it.
///
/// All methods are synchronous. Hint fetches and result deliveries are handed
/// out as requests/jobs for the caller to run elsewhere, and their outcomes come
/// back through [`GameService::finish_hint`] and [`GameService::record_report`].
pub struct GameService {
    catalog: Arc<Catalog>,
    clock: Clock,
    rng: StdRng,
    timeline: GameTimeline,
    hints: HintGate,
    reporter: ResultReporter,
    signals: Vec<GameSignal>,
}

impl GameService {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, clock: Clock) -> Self {
        Self {
            catalog,
            clock,
            rng: StdRng::from_os_rng(),
            timeline: GameTimeline::new(),
            hints: HintGate::new(),
            reporter: ResultReporter::new(None),
            signals: Vec::new(),
        }
    }

    /// Make deck dealing and hint selection reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: ResultReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Deal a fresh deck and start a session, abandoning any current one.
    ///
    /// # Errors
    ///
    /// Returns `GameError::MissingStudent` for a blank name or class, and
    /// `GameError::Deck` when the chosen list is too small for the difficulty.
    pub fn start(&mut self, setup: SessionSetup) -> Result<SessionToken, GameError> {
        if setup.student_name.trim().is_empty() || setup.student_class.trim().is_empty() {
            return Err(GameError::MissingStudent);
        }

        let deck = DeckBuilder::new(&self.catalog, setup.list)
            .with_mode(setup.mode)
            .with_difficulty(setup.difficulty)
            .build(&mut self.rng)?;

        info!(
            student = %setup.student_name,
            list = %setup.list,
            mode = %setup.mode,
            difficulty = %setup.difficulty,
            pairs = deck.len() / 2,
            "session started"
        );
        let token = self.timeline.start(deck, setup)?;
        self.hints.clear();
        self.reporter.reset();
        self.signals.clear();
        Ok(token)
    }

    pub fn request_flip(&mut self, position: usize) -> bool {
        self.timeline.request_flip(position)
    }

    /// Let `delta` of game time pass: timer ticks, due resolutions, hint expiry.
    ///
    /// A fixed clock is moved along with the timeline so hint expiry stays
    /// deterministic in tests.
    pub fn advance(&mut self, delta: Duration) {
        self.timeline.advance(delta);
        if let Ok(delta) = chrono::Duration::from_std(delta) {
            self.clock.advance(delta);
        }
        self.hints.clear_expired(self.clock.now());
    }

    /// Ask for a hint about a random unmatched entry.
    pub fn request_hint(&mut self) -> HintTicket {
        self.hints
            .begin(self.timeline.session(), &self.catalog, &mut self.rng)
    }

    /// Deliver the text fetched for `request`; emits `HintReady` if it is shown.
    pub fn finish_hint(&mut self, request: &HintRequest, text: &str) -> Option<String> {
        let now = self.clock.now();
        let token = self.timeline.session().token();
        let shown = self.hints.finish(request, text, now, token);
        match &shown {
            Some(text) => self.signals.push(GameSignal::HintReady(text.clone())),
            None => debug!(entry = %request.entry_id, "discarded hint for an earlier session"),
        }
        shown
    }

    #[must_use]
    pub fn active_hint(&self) -> Option<&str> {
        self.hints.active_hint(self.clock.now())
    }

    /// Whether a hint for the current session is still being fetched.
    #[must_use]
    pub fn is_fetching_hint(&self) -> bool {
        self.hints.is_fetching(self.timeline.session().token())
    }

    /// Word-family note of a catalog entry, shown when its pair is matched.
    #[must_use]
    pub fn word_family(&self, entry_id: &EntryId) -> Option<&str> {
        self.catalog.entry(entry_id)?.family()
    }

    /// Hand the current session's summary to the reporter.
    pub fn dispatch_report(&mut self, summary: SessionSummary) -> Option<ReportJob> {
        let token = self.timeline.session().token()?;
        self.reporter.dispatch(token, summary)
    }

    /// Store a delivery outcome; ignored when `token` is not the session that
    /// was last dispatched.
    pub fn record_report(&mut self, token: SessionToken, outcome: ReportStatus) {
        self.reporter.record(token, outcome);
    }

    #[must_use]
    pub fn report_status(&self) -> ReportStatus {
        self.reporter.status()
    }

    /// Drain signals: session signals first, then hint deliveries.
    pub fn take_signals(&mut self) -> Vec<GameSignal> {
        let mut signals = self.timeline.take_signals();
        signals.append(&mut self.signals);
        for signal in &signals {
            match signal {
                GameSignal::Matched(entry_id) => debug!(entry = %entry_id, "pair matched"),
                GameSignal::Mismatched => debug!("pair mismatched"),
                GameSignal::Completed(summary) => info!(
                    score = summary.score(),
                    seconds = summary.elapsed_seconds(),
                    "session complete"
                ),
                GameSignal::Flipped(_) | GameSignal::HintReady(_) => {}
            }
        }
        signals
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        self.timeline.session()
    }
}
