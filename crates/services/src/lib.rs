#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod game_service;
pub mod hint_service;
pub mod report_service;

pub use match_core::Clock;

pub use config::{GameConfig, HintConfig};
pub use error::{ConfigError, GameError, HintError, ReportError};
pub use game_service::{GameService, load_catalog};
pub use hint_service::{ChatHintProvider, EMPTY_HINT, FALLBACK_HINT, HintProvider, fetch_hint};
pub use report_service::{HttpResultSink, ReportJob, ReportStatus, ResultReporter, ResultSink};
