#![forbid(unsafe_code)]

//! Domain core of the vocabulary matching game: catalog, deck dealing, the
//! flip/match session state machine, its resolution timeline and the hint gate.
//! Nothing in here performs I/O.

pub mod catalog;
pub mod deck;
pub mod hint;
pub mod model;
pub mod session;
pub mod time;
pub mod timeline;

pub use catalog::{Catalog, CatalogError};
pub use deck::{DeckBuilder, DeckError};
pub use hint::{HintGate, HintRequest, HintTicket};
pub use session::{GameSignal, SessionError, SessionState, SessionStatus, Verdict};
pub use time::Clock;
pub use timeline::GameTimeline;
