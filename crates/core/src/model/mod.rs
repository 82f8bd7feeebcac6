mod card;
mod ids;
mod options;
mod session;
mod vocab;

pub use ids::{EntryId, SessionToken};

pub use card::{Card, CardRole};
pub use options::{Difficulty, ListId, ParseOptionError, QuizMode};
pub use session::{SessionSetup, SessionSummary};
pub use vocab::VocabularyEntry;
